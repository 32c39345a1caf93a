//! BoxedEff - type-erased computation for opt-in boxing.
//!
//! Use `BoxedEff` when you need to:
//! - Store different computations in a collection
//! - Return different computations from match arms (handlers do this a lot)
//! - Write recursive computations or self-referential handlers

use std::marker::PhantomData;

use crate::eff::trait_def::Eff;
use crate::env::Env;
use crate::stack::EffectStack;

/// A type-erased computation.
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
///
/// fn countdown(n: u32) -> BoxedEff<Stack![], u32> {
///     if n == 0 {
///         pure(0).boxed()
///     } else {
///         pure(n)
///             .and_then(move |x| countdown(x - 1).map(move |sum| x + sum))
///             .boxed()
///     }
/// }
///
/// assert_eq!(run_pure(countdown(4)), 10);
/// ```
pub struct BoxedEff<Es, T> {
    run_fn: Box<dyn FnOnce(&Env) -> T>,
    _stack: PhantomData<fn() -> Es>,
}

impl<Es, T> std::fmt::Debug for BoxedEff<Es, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedEff")
            .field("run_fn", &"<function>")
            .finish()
    }
}

impl<Es: EffectStack, T: 'static> BoxedEff<Es, T> {
    /// Box any computation over the same stack.
    pub fn new<M>(eff: M) -> Self
    where
        M: Eff<Output = T, Stack = Es>,
    {
        BoxedEff {
            run_fn: Box::new(move |env: &Env| eff.run(env)),
            _stack: PhantomData,
        }
    }
}

impl<Es: EffectStack, T: 'static> Eff for BoxedEff<Es, T> {
    type Output = T;
    type Stack = Es;

    fn run(self, env: &Env) -> T {
        (self.run_fn)(env)
    }
}
