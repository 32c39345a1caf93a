//! Extension trait providing combinator methods for all computations.
//!
//! The `EffExt` trait is automatically implemented for every type that
//! implements `Eff`.

use crate::eff::boxed::BoxedEff;
use crate::eff::combinators::{AndThen, Map, Then, Zip};
use crate::eff::trait_def::Eff;
use crate::op::{Answer, Reply};

/// Extension trait providing combinator methods for all computations.
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
///
/// let eff = pure::<_, Stack![]>(20)
///     .map(|x| x + 1)
///     .and_then(|x| pure(x * 2));
///
/// assert_eq!(run_pure(eff), 42);
/// ```
pub trait EffExt: Eff {
    /// Transform the output value.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: FnOnce(Self::Output) -> U + 'static,
        U: 'static,
    {
        Map { inner: self, f }
    }

    /// Chain a dependent computation over the same stack.
    fn and_then<M2, F>(self, f: F) -> AndThen<Self, F>
    where
        M2: Eff<Stack = Self::Stack>,
        F: FnOnce(Self::Output) -> M2 + 'static,
    {
        AndThen { inner: self, f }
    }

    /// Run `next` after this computation, keeping only its output.
    fn then<M2>(self, next: M2) -> Then<Self, M2>
    where
        M2: Eff<Stack = Self::Stack>,
    {
        Then {
            first: self,
            second: next,
        }
    }

    /// Run `other` after this computation and pair both outputs.
    fn zip<M2>(self, other: M2) -> Zip<Self, M2>
    where
        M2: Eff<Stack = Self::Stack>,
    {
        Zip {
            first: self,
            second: other,
        }
    }

    /// Answer an operation with this computation's output.
    ///
    /// The usual last step of a handler arm:
    ///
    /// ```rust,ignore
    /// State::Get(reply) => state::get().answering(reply).boxed(),
    /// ```
    fn answering(
        self,
        reply: Reply<Self::Output>,
    ) -> Map<Self, impl FnOnce(Self::Output) -> Answer + 'static> {
        self.map(move |value| reply.answer(value))
    }

    /// Erase the concrete type of this computation.
    fn boxed(self) -> BoxedEff<Self::Stack, Self::Output> {
        BoxedEff::new(self)
    }
}

impl<M: Eff> EffExt for M {}
