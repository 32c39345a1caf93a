//! Eff trait definition - the core abstraction for effectful computations.
//!
//! An `Eff` is a suspended computation that:
//! - Produces a value of type `Output`
//! - Runs against an effect stack of type `Stack`
//!
//! # Design Philosophy
//!
//! This trait follows the same pattern as `Iterator`:
//! - Combinators return concrete types (zero-cost abstractions)
//! - Use `.boxed()` when you need type erasure
//!
//! Running is synchronous call/return. An operation sent from inside `run`
//! reaches its handler as a direct call, and the handler's answer comes back
//! before `run` continues.

use crate::env::Env;
use crate::stack::EffectStack;

/// The core Eff trait - a computation that may send operations to handlers.
///
/// # Type Parameters
///
/// * `Output` - The value produced by this computation
/// * `Stack` - The effects this computation may send, innermost first
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
/// use undertow::effects::state::{self, State};
///
/// fn bump<Es, I>() -> impl Eff<Output = i32, Stack = Es>
/// where
///     Es: Member<State<i32>, I>,
///     I: 'static,
/// {
///     state::modify(|n: i32| n + 1).then(state::get())
/// }
///
/// let (value, final_state) = run_pure(state::run_state(41, bump::<Stack![State<i32>], _>()));
/// assert_eq!((value, final_state), (42, 42));
/// ```
pub trait Eff: Sized + 'static {
    /// The value produced by this computation.
    type Output: 'static;

    /// The effect stack this computation runs against.
    type Stack: EffectStack;

    /// Run this computation against a runtime stack.
    ///
    /// `env` must have been built for `Self::Stack`: one position per
    /// effect, in the same order. The crate's combinators guarantee this;
    /// custom implementations only ever forward the `env` they receive.
    fn run(self, env: &Env) -> Self::Output;
}
