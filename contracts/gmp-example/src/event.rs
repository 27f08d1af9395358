use gateway_std::IntoEvent;
use soroban_sdk::{Bytes, String};

#[derive(Debug, PartialEq, Eq, IntoEvent)]
pub struct ExecutedEvent {
    #[topic]
    pub source_chain: String,
    #[topic]
    pub message_id: String,
    #[topic]
    pub source_address: String,
    pub payload: Bytes,
}
