//! Pure computation - wraps a value with no operations.

use std::marker::PhantomData;

use crate::eff::trait_def::Eff;
use crate::env::Env;
use crate::stack::EffectStack;

/// A pure value wrapped as a computation.
///
/// Zero-cost: the struct stores only the value itself.
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
///
/// let eff = pure::<_, Stack![]>(42);
/// assert_eq!(run_pure(eff), 42);
/// ```
pub struct Pure<T, Es> {
    value: T,
    _stack: PhantomData<fn() -> Es>,
}

impl<T: std::fmt::Debug, Es> std::fmt::Debug for Pure<T, Es> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pure").field("value", &self.value).finish()
    }
}

impl<T, Es> Pure<T, Es> {
    /// Create a new Pure computation from a value.
    pub fn new(value: T) -> Self {
        Pure {
            value,
            _stack: PhantomData,
        }
    }
}

impl<T: 'static, Es: EffectStack> Eff for Pure<T, Es> {
    type Output = T;
    type Stack = Es;

    fn run(self, _env: &Env) -> T {
        self.value
    }
}
