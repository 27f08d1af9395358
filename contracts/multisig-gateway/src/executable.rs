use soroban_sdk::{contractclient, contracterror, Address, Bytes, Env, String};

use crate::MultisigGatewayMessagingClient;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ExecutableError {
    NotApproved = 1,
}

/// Interface for an application receiving messages through the gateway.
#[contractclient(name = "ExecutableClient")]
pub trait ExecutableInterface {
    /// Return the trusted gateway contract id.
    fn gateway(env: &Env) -> Address;

    /// Execute a cross-chain message with the given payload. Implementations must call
    /// [`ExecutableInterface::validate_message`] before acting on the payload.
    fn execute(
        env: Env,
        source_chain: String,
        message_id: String,
        source_address: String,
        payload: Bytes,
    ) -> Result<(), ExecutableError>;

    /// Consume the gateway's approval of this message for the current contract.
    ///
    /// Not exposed by the contract, as `contractimpl` ignores default trait methods.
    fn validate_message(
        env: &Env,
        source_chain: &String,
        message_id: &String,
        source_address: &String,
        payload: &Bytes,
    ) -> Result<(), ExecutableError> {
        let gateway = MultisigGatewayMessagingClient::new(env, &Self::gateway(env));

        if gateway.validate_message(
            &env.current_contract_address(),
            source_chain,
            message_id,
            source_address,
            &env.crypto().keccak256(payload).into(),
        ) {
            Ok(())
        } else {
            Err(ExecutableError::NotApproved)
        }
    }
}
