use crate::{
    error::ContractError,
    types::{Message, Proof, WeightedSigners},
    MultisigGatewayMessagingInterface,
};
use soroban_sdk::{contractclient, Address, BytesN, Env, Vec};

#[contractclient(name = "MultisigGatewayClient")]
pub trait MultisigGatewayInterface: MultisigGatewayMessagingInterface {
    /// Approves a batch of messages signed by a valid signer set.
    ///
    /// Messages that are already approved or executed are skipped.
    fn approve_messages(
        env: Env,
        messages: Vec<Message>,
        proof: Proof,
    ) -> Result<(), ContractError>;

    /// Rotates to `signers`, signed off by a valid signer set.
    ///
    /// Without `bypass_rotation_delay` the proof must come from the latest signer set and the
    /// minimum rotation delay must have passed. With it, the operator has to authorize the call and
    /// any signer set still within the retention window may sign.
    ///
    /// Being the operator grants nothing by itself: an operator call has to set
    /// `bypass_rotation_delay` to skip the latest-set and delay checks.
    fn rotate_signers(
        env: Env,
        signers: WeightedSigners,
        proof: Proof,
        bypass_rotation_delay: bool,
    ) -> Result<(), ContractError>;

    /// Transfers operatorship to `new_operator`. `caller` must be the current operator or the owner.
    fn transfer_operatorship(
        env: Env,
        caller: Address,
        new_operator: Address,
    ) -> Result<(), ContractError>;

    /// Returns the operator address, or the zero address if none is set.
    fn operator(env: &Env) -> Address;

    fn epoch(env: &Env) -> u64;

    fn epoch_by_signers_hash(env: &Env, signers_hash: BytesN<32>) -> Option<u64>;

    fn signers_hash_by_epoch(env: &Env, epoch: u64) -> Option<BytesN<32>>;

    /// Verifies `proof` over `data_hash`. Returns whether the proof was signed by the latest signer set.
    fn validate_proof(env: &Env, data_hash: BytesN<32>, proof: Proof) -> Result<bool, ContractError>;

    fn domain_separator(env: &Env) -> BytesN<32>;

    fn minimum_rotation_delay(env: &Env) -> u64;

    fn previous_signers_retention(env: &Env) -> u64;

    fn last_rotation_timestamp(env: &Env) -> u64;
}
