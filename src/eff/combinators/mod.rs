//! Zero-cost combinator types for composing computations.
//!
//! This module contains the concrete types returned by the combinators.
//! Most users won't name them directly; the methods on
//! [`EffExt`](crate::eff::EffExt) return them behind `impl Eff<...>`.

mod and_then;
mod from_env;
mod lazy;
mod map;
mod pure;
mod sequence;
mod then;
mod zip;

pub use and_then::AndThen;
pub(crate) use from_env::FromEnv;
pub use lazy::Lazy;
pub use map::Map;
pub use pure::Pure;
pub use sequence::Sequence;
pub use then::Then;
pub use zip::Zip;
