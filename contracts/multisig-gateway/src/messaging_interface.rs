use soroban_sdk::{contractclient, Address, Bytes, BytesN, Env, String};

/// The subset of the gateway that destination applications talk to.
#[contractclient(name = "MultisigGatewayMessagingClient")]
pub trait MultisigGatewayMessagingInterface {
    /// Records an outbound call to `destination_address` on `destination_chain` as a `contract_called` event.
    ///
    /// Requires authorization from `caller`. Carries no verification and never fails for well-formed input.
    fn call_contract(
        env: Env,
        caller: Address,
        destination_chain: String,
        destination_address: String,
        payload: Bytes,
    );

    /// Returns true if the message identified by `source_chain` and `message_id` is approved
    /// with exactly these fields. Does not consume the approval.
    fn is_message_approved(
        env: Env,
        source_chain: String,
        message_id: String,
        source_address: String,
        contract_address: Address,
        payload_hash: BytesN<32>,
    ) -> bool;

    /// Returns true if the message has been consumed by its destination.
    fn is_message_executed(env: Env, source_chain: String, message_id: String) -> bool;

    /// Consumes an approved message. `caller` must authorize and is used as the message's `contract_address`,
    /// so only the intended destination can consume it.
    ///
    /// Returns true exactly once per approved message; returns false without changing state if the message is
    /// unknown, already executed, or does not match the approved hash.
    fn validate_message(
        env: Env,
        caller: Address,
        source_chain: String,
        message_id: String,
        source_address: String,
        payload_hash: BytesN<32>,
    ) -> bool;
}
