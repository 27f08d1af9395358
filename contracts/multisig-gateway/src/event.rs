use crate::types::{Message, WeightedSigners};
use gateway_std::IntoEvent;
use soroban_sdk::{Address, Bytes, BytesN, String};

#[derive(Debug, PartialEq, Eq, IntoEvent)]
pub struct ContractCalledEvent {
    #[topic]
    pub caller: Address,
    #[topic]
    pub destination_chain: String,
    #[topic]
    pub destination_address: String,
    #[topic]
    pub payload_hash: BytesN<32>,
    pub payload: Bytes,
}

#[derive(Debug, PartialEq, Eq, IntoEvent)]
pub struct MessageApprovedEvent {
    #[topic]
    pub command_id: BytesN<32>,
    pub message: Message,
}

#[derive(Debug, PartialEq, Eq, IntoEvent)]
pub struct MessageExecutedEvent {
    #[topic]
    pub command_id: BytesN<32>,
    pub message: Message,
}

#[derive(Debug, PartialEq, Eq, IntoEvent)]
pub struct SignersRotatedEvent {
    #[topic]
    pub epoch: u64,
    #[topic]
    pub signers_hash: BytesN<32>,
    pub signers: WeightedSigners,
}

#[derive(Debug, PartialEq, Eq, IntoEvent)]
pub struct OperatorshipTransferredEvent {
    #[topic]
    pub previous_operator: Address,
    #[topic]
    pub new_operator: Address,
}
