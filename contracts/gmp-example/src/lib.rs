#![no_std]

pub mod contract;
mod event;
mod storage_types;

pub use contract::{GmpExample, GmpExampleClient};
