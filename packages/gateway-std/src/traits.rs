#[cfg(any(test, feature = "testutils"))]
pub use host_collections::*;

#[cfg(any(test, feature = "testutils"))]
mod host_collections {
    extern crate std;

    use soroban_sdk::{Env, IntoVal, TryFromVal, Val, Vec};

    /// Moves a natively built collection into host memory.
    pub trait IntoVec<T> {
        fn into_vec(self, env: &Env) -> Vec<T>;
    }

    impl<T> IntoVec<T> for std::vec::Vec<T>
    where
        T: IntoVal<Env, Val> + TryFromVal<Env, Val>,
    {
        fn into_vec(self, env: &Env) -> Vec<T> {
            self.into_iter().fold(Vec::new(env), |mut items, item| {
                items.push_back(item);
                items
            })
        }
    }

}
