//! Reusable contract surfaces shared by the gateway and its applications.

mod ownable;

pub use ownable::*;

/// Storage keys owned by this module.
///
/// Variants use a `Module_Name` shape that regular contract keys never take,
/// so they cannot clash with a contract's own `DataKey` entries.
mod keys {
    #![allow(non_camel_case_types)]

    use soroban_sdk::contracttype;

    #[contracttype]
    pub enum OwnershipKey {
        Ownership_Owner,
    }
}
