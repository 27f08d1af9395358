use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    /// Auth
    InvalidThreshold = 1,
    InvalidSigners = 2,
    InvalidWeights = 3,
    DuplicateSigners = 4,
    InsufficientRotationDelay = 5,
    NotLatestSigners = 6,
    InvalidSignature = 7,
    LowSignaturesWeight = 8,
    /// Messages
    InvalidMessages = 9,
    /// Operator
    InvalidSender = 10,
    InvalidOperator = 11,
}
