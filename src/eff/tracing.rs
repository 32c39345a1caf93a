//! Tracing support for computations.
//!
//! This module provides the `Instrument` combinator and `instrument` method
//! for running a computation inside a tracing span. Feature-gated behind
//! `#[cfg(feature = "tracing")]`.

use crate::eff::trait_def::Eff;
use crate::env::Env;

/// A computation wrapped in a tracing span.
///
/// Created by [`EffTracingExt::instrument`].
#[derive(Debug)]
pub struct Instrument<M> {
    pub(crate) inner: M,
    pub(crate) span: tracing::Span,
}

impl<M: Eff> Eff for Instrument<M> {
    type Output = M::Output;
    type Stack = M::Stack;

    fn run(self, env: &Env) -> Self::Output {
        let _entered = self.span.enter();
        self.inner.run(env)
    }
}

/// Extension trait for adding tracing instrumentation to computations.
pub trait EffTracingExt: Eff {
    /// Run this computation inside `span`.
    ///
    /// Handlers reached from inside the computation run inside the span
    /// too, so their dispatch events nest under it.
    ///
    /// ```rust,ignore
    /// use undertow::prelude::*;
    /// use undertow::eff::EffTracingExt;
    ///
    /// let eff = state::modify(|n: u32| n + 1)
    ///     .instrument(tracing::debug_span!("bump"));
    /// ```
    fn instrument(self, span: tracing::Span) -> Instrument<Self> {
        Instrument { inner: self, span }
    }
}

impl<M: Eff> EffTracingExt for M {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_instrument_returns_value() {
        let eff = pure::<_, Stack![]>(42).instrument(tracing::info_span!("test_span"));
        assert_eq!(run_pure(eff), 42);
    }

    #[test]
    fn test_nested_spans() {
        let inner = pure::<_, Stack![]>(1).instrument(tracing::debug_span!("inner_op"));
        let outer = inner.and_then(|x| pure(x + 1).instrument(tracing::debug_span!("outer_op")));
        assert_eq!(run_pure(outer), 2);
    }
}
