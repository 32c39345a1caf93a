//! Lazy computation - defers a closure until the computation runs.

use std::marker::PhantomData;

use crate::eff::trait_def::Eff;
use crate::env::Env;
use crate::stack::EffectStack;

/// A deferred closure.
///
/// The closure runs once, when the computation runs, never at construction.
pub struct Lazy<F, Es> {
    f: F,
    _stack: PhantomData<fn() -> Es>,
}

impl<F, Es> std::fmt::Debug for Lazy<F, Es> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lazy").field("f", &"<function>").finish()
    }
}

impl<F, Es> Lazy<F, Es> {
    /// Create a new Lazy computation.
    pub fn new(f: F) -> Self {
        Lazy {
            f,
            _stack: PhantomData,
        }
    }
}

impl<F, T, Es> Eff for Lazy<F, Es>
where
    F: FnOnce() -> T + 'static,
    T: 'static,
    Es: EffectStack,
{
    type Output = T;
    type Stack = Es;

    fn run(self, _env: &Env) -> T {
        (self.f)()
    }
}
