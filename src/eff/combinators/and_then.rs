//! AndThen combinator - chains dependent computations.

use crate::eff::trait_def::Eff;
use crate::env::Env;

/// AndThen combinator - chains dependent computations.
///
/// The chained computation must run against the same stack. Use
/// [`raise`](crate::algebra::raise) or [`inject`](crate::algebra::inject)
/// to adapt a computation written for a smaller stack first.
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
///
/// let eff = pure::<_, Stack![]>(21).and_then(|x| pure(x * 2));
/// assert_eq!(run_pure(eff), 42);
/// ```
pub struct AndThen<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for AndThen<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndThen")
            .field("inner", &"<eff>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, M2> Eff for AndThen<Inner, F>
where
    Inner: Eff,
    M2: Eff<Stack = Inner::Stack>,
    F: FnOnce(Inner::Output) -> M2 + 'static,
{
    type Output = M2::Output;
    type Stack = Inner::Stack;

    fn run(self, env: &Env) -> Self::Output {
        let value = self.inner.run(env);
        (self.f)(value).run(env)
    }
}
