use core::fmt::Debug;
use soroban_sdk::{Env, IntoVal, Topics, Val};

/// A structured contract event.
///
/// Topics are indexed by off-chain consumers, so they should only carry small, filterable values.
/// Everything else belongs in the data section.
pub trait Event: Debug + PartialEq + Sized {
    fn topics(&self, env: &Env) -> impl Topics + Debug;

    fn data(&self, env: &Env) -> impl IntoVal<Env, Val> + Debug;

    fn emit(self, env: &Env) {
        env.events().publish(self.topics(env), self.data(env));
    }
}
