use crate::events::Event;
use crate::interfaces::keys::OwnershipKey;
use core::fmt::Debug;
use soroban_sdk::{contractclient, Address, Env, IntoVal, Symbol, Topics, Val, Vec};

/// Single privileged owner of a contract.
///
/// Contracts usually get this through the `#[ownable]` attribute, which forwards
/// both entry points to the free functions below.
#[contractclient(name = "OwnableClient")]
pub trait OwnableInterface {
    fn owner(env: &Env) -> Address;

    /// Hands the contract to `new_owner`. Only the current owner may call this.
    fn transfer_ownership(env: &Env, new_owner: Address);
}

pub fn owner(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&OwnershipKey::Ownership_Owner)
        .expect("owner not found")
}

pub fn is_owner(env: &Env, account: &Address) -> bool {
    env.storage()
        .instance()
        .get::<_, Address>(&OwnershipKey::Ownership_Owner)
        .is_some_and(|owner| owner == *account)
}

pub fn transfer_ownership<T: OwnableInterface>(env: &Env, new_owner: Address) {
    let previous_owner = T::owner(env);
    previous_owner.require_auth();

    set_owner(env, &new_owner);

    OwnershipTransferredEvent {
        previous_owner,
        new_owner,
    }
    .emit(env);
}

/// Writes the owner without any authorization. Call it from constructors only,
/// never expose it as an entry point.
pub fn set_owner(env: &Env, owner: &Address) {
    env.storage()
        .instance()
        .set(&OwnershipKey::Ownership_Owner, owner);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipTransferredEvent {
    pub previous_owner: Address,
    pub new_owner: Address,
}

impl Event for OwnershipTransferredEvent {
    fn topics(&self, env: &Env) -> impl Topics + Debug {
        (
            Symbol::new(env, "ownership_transferred"),
            self.previous_owner.clone(),
            self.new_owner.clone(),
        )
    }

    fn data(&self, env: &Env) -> impl IntoVal<Env, Val> + Debug {
        Vec::<Val>::new(env)
    }
}
