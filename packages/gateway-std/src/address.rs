use soroban_sdk::{Address, Env, String};

/// Stellar's "dead" account: the ed25519 account whose public key is all zeroes.
/// Nobody holds its secret key, so it can stand in for an unset role.
const ZERO_ADDRESS: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

pub trait AddressExt {
    fn zero(env: &Env) -> Address;

    fn is_zero(&self) -> bool;
}

impl AddressExt for Address {
    fn zero(env: &Env) -> Address {
        Self::from_string(&String::from_str(env, ZERO_ADDRESS))
    }

    fn is_zero(&self) -> bool {
        *self == Self::zero(self.env())
    }
}
