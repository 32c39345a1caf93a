//! Computations over typed effect stacks.
//!
//! A computation is any type implementing [`Eff`]. Combinators return
//! concrete types and cost nothing until run; [`BoxedEff`] erases them when
//! a single type is needed:
//!
//! ```rust
//! use undertow::prelude::*;
//!
//! // Zero allocations: the type is Map<AndThen<Pure<..>, ..>, ..>
//! let eff = pure::<_, Stack![]>(1)
//!     .and_then(|x| pure(x + 1))
//!     .map(|x| x.to_string());
//!
//! assert_eq!(run_pure(eff), "2");
//! ```

pub mod boxed;
pub mod combinators;
pub mod constructors;
pub mod ext;
#[cfg(feature = "tracing")]
pub mod tracing;
mod trait_def;

pub use boxed::BoxedEff;
pub use combinators::{AndThen, Lazy, Map, Pure, Sequence, Then, Zip};
pub use constructors::{for_each, lazy, pure, sequence};
pub use ext::EffExt;
pub use trait_def::Eff;

#[cfg(feature = "tracing")]
pub use self::tracing::{EffTracingExt, Instrument};
