//! # Undertow
//!
//! An extensible effect-handler runtime with typed effect stacks.
//!
//! A computation declares the effects it may perform in its type: an
//! [`Eff`](eff::Eff) whose `Stack` is a type-level list such as
//! `Stack![State<u32>, Reader<Config>]`. Operations are sent to whatever
//! handler the surrounding program installed for their effect; handlers are
//! ordinary closures that can themselves perform effects, intercept
//! operations of handlers installed further out, and decide where the
//! computations embedded in higher-order operations run.
//!
//! ## Quick Example
//!
//! ```rust
//! use undertow::prelude::*;
//! use undertow::effects::{reader::{self, Reader}, state::{self, State}};
//!
//! // Any stack holding both effects will do.
//! fn step<Es, I1, I2>() -> impl Eff<Output = u32, Stack = Es>
//! where
//!     Es: Member<Reader<u32>, I1> + Member<State<u32>, I2>,
//!     I1: 'static,
//!     I2: 'static,
//! {
//!     reader::ask::<u32, Es, I1>()
//!         .and_then(|inc| state::modify::<u32, Es, I2, _>(move |n| n + inc))
//!         .then(state::get::<u32, Es, I2>())
//! }
//!
//! let program = step::<Stack![State<u32>, Reader<u32>], _, _>()
//!     .then(step());
//! let program = reader::run_reader(5, state::run_state(1, program));
//!
//! assert_eq!(run_pure(program), (11, 11));
//! ```
//!
//! ## Layout
//!
//! - [`op`]: the contract every effect implements
//! - [`stack`]: type-level effect stacks and membership proofs
//! - [`eff`]: computations and their combinators
//! - [`dispatch`]: sending operations and installing handlers
//! - [`send_site`]: what a handler knows about where an operation came from
//! - [`algebra`]: moving computations between stacks
//! - [`run`]: running a fully handled computation
//! - [`effects`]: reader, state, error, writer, fresh-name and output effects
//!
//! ## Logging
//!
//! With the `tracing` feature enabled, installation, dispatch and scope exit
//! emit `trace`/`debug` events, and [`EffTracingExt`](eff::EffTracingExt)
//! wraps computations in spans.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! debug_event {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_event {
    ($($arg:tt)*) => {};
}

pub mod algebra;
pub mod arena;
pub mod dispatch;
pub mod eff;
pub mod effects;
pub mod env;
pub mod monoid;
pub mod op;
pub mod run;
pub mod send_site;
pub mod stack;
pub mod testing;

// Re-exports
pub use eff::{BoxedEff, Eff, EffExt};
pub use env::Env;
pub use op::{Answer, Effect, Reply, Retarget, Sub};
pub use run::{run_io, run_pure, Io};
pub use send_site::SendSite;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algebra::{inject, raise, raise_n, raise_under, subsume, subsume_n};
    pub use crate::dispatch::{
        impose, impose_n, interpose, interpret, reinterpret, reinterpret_n, send, send_higher,
        send_op, transform, translate, BoxedHandler, Suspender,
    };
    pub use crate::eff::{for_each, lazy, pure, sequence, BoxedEff, Eff, EffExt};
    pub use crate::env::Env;
    pub use crate::op::{Answer, Effect, Reply, Retarget, Sub};
    pub use crate::run::{run_io, run_pure, Io};
    pub use crate::send_site::SendSite;
    pub use crate::stack::{Append, Concat, Cons, EffectStack, Here, Member, Nil, Subset, There};
    pub use crate::Stack;

    #[cfg(feature = "tracing")]
    pub use crate::eff::EffTracingExt;
}
