//! Map combinator - transforms the output of a computation.

use crate::eff::trait_def::Eff;
use crate::env::Env;

/// Map combinator - transforms the output value.
///
/// Zero-cost: stores only the inner computation and the function.
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
///
/// let eff = pure::<_, Stack![]>(21).map(|x| x * 2);
/// assert_eq!(run_pure(eff), 42);
/// ```
pub struct Map<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for Map<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("inner", &"<eff>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, U> Eff for Map<Inner, F>
where
    Inner: Eff,
    F: FnOnce(Inner::Output) -> U + 'static,
    U: 'static,
{
    type Output = U;
    type Stack = Inner::Stack;

    fn run(self, env: &Env) -> U {
        (self.f)(self.inner.run(env))
    }
}
