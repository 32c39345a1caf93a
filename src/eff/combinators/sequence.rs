//! Sequence combinator - runs a list of computations in order.

use crate::eff::trait_def::Eff;
use crate::env::Env;

/// Runs every computation in order and collects the outputs.
///
/// Operations sent by the computations reach their handlers in list order.
pub struct Sequence<M> {
    pub(crate) items: Vec<M>,
}

impl<M> std::fmt::Debug for Sequence<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("len", &self.items.len())
            .finish()
    }
}

impl<M: Eff> Eff for Sequence<M> {
    type Output = Vec<M::Output>;
    type Stack = M::Stack;

    fn run(self, env: &Env) -> Self::Output {
        self.items.into_iter().map(|m| m.run(env)).collect()
    }
}
