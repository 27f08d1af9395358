use soroban_sdk::{contracttype, BytesN};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MessageApprovalValue {
    NotApproved,
    Approved(BytesN<32>),
    Executed,
}

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    /// Gateway
    Operator,
    MessageApproval(BytesN<32>),
    /// Auth
    PreviousSignersRetention,
    DomainSeparator,
    MinimumRotationDelay,
    Epoch,
    LastRotationTimestamp,
    SignersHashByEpoch(u64),
    EpochBySignersHash(BytesN<32>),
}
