//! The operation contract every effect implements.
//!
//! An effect is an `enum` whose variants are its operations. Each operation
//! carries a [`Reply<T>`] naming the type of its result; the handler answers
//! by consuming that token. Higher-order operations additionally carry
//! [`Sub`]s: suspended computations written against the sender's effect
//! stack, whose execution context is chosen by the handler through its
//! [`SendSite`](crate::send_site::SendSite).
//!
//! ```rust
//! use undertow::op::{Effect, Reply, Retarget, Sub};
//!
//! pub enum Counter {
//!     Increment(Reply<()>),
//!     Read(Reply<u32>),
//!     // A higher-order operation: run the block, then report how many
//!     // increments it performed.
//!     Measure(Sub<Box<dyn FnOnce(u32) -> undertow::op::Answer>>),
//! }
//!
//! impl Effect for Counter {
//!     fn retarget(self, target: &Retarget) -> Self {
//!         match self {
//!             Counter::Measure(block) => Counter::Measure(target.sub(block)),
//!             other => other,
//!         }
//!     }
//! }
//! ```

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;

use crate::env::Env;

/// An effect: a discriminated set of operations.
///
/// `retarget` must hand every [`Sub`] of the operation to
/// [`Retarget::sub`]. Forwarding combinators rely on it to keep embedded
/// computations running against the stack they were written for.
pub trait Effect: Sized + 'static {
    /// Pin every embedded computation to the stack held by `target`.
    fn retarget(self, target: &Retarget) -> Self;
}

/// Typed result slot of one operation.
///
/// Only the dispatcher creates replies, and a reply is consumed by
/// answering, so a handler can only produce a value of the operation's
/// declared result type.
pub struct Reply<T> {
    _result: PhantomData<fn(T)>,
}

impl<T> fmt::Debug for Reply<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reply<{}>", type_name::<T>())
    }
}

impl<T: 'static> Reply<T> {
    pub(crate) fn new() -> Self {
        Reply {
            _result: PhantomData,
        }
    }

    /// Split into two replies of the same type.
    ///
    /// For operations with alternative continuations (a body and a
    /// recovery, say) where exactly one of them ends up answering.
    pub fn split(self) -> (Reply<T>, Reply<T>) {
        (Reply::new(), Reply::new())
    }

    /// Answer the operation with `value`.
    pub fn answer(self, value: T) -> Answer {
        Answer {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }
}

/// A handler's type-erased answer to one operation.
pub struct Answer {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl fmt::Debug for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Answer<{}>", self.type_name)
    }
}

impl Answer {
    /// Recover the typed result.
    ///
    /// # Panics
    ///
    /// Panics if the answer was produced through a reply of another type,
    /// which requires a handler to answer one operation with the reply of a
    /// different one.
    pub(crate) fn into_value<T: 'static>(self) -> T {
        match self.value.downcast::<T>() {
            Ok(value) => *value,
            Err(_) => panic!(
                "handler answered with {} where {} was expected",
                self.type_name,
                type_name::<T>()
            ),
        }
    }
}

/// A suspended computation embedded in an operation.
///
/// A `Sub` was written against the sender's effect stack. The handler runs it
/// through [`SendSite::to_eff`](crate::send_site::SendSite::to_eff) or
/// [`SendSite::to_eff_with`](crate::send_site::SendSite::to_eff_with).
pub struct Sub<X> {
    run: Box<dyn FnOnce(&Env) -> X>,
}

impl<X> fmt::Debug for Sub<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub<{}>", type_name::<X>())
    }
}

impl<X: 'static> Sub<X> {
    pub(crate) fn new(run: impl FnOnce(&Env) -> X + 'static) -> Self {
        Sub { run: Box::new(run) }
    }

    pub(crate) fn run(self, env: &Env) -> X {
        (self.run)(env)
    }
}

/// Re-targets the [`Sub`]s of an operation at a fixed stack.
///
/// Obtained through [`SendSite::retarget`](crate::send_site::SendSite::retarget);
/// effect authors only ever call [`Retarget::sub`].
#[derive(Clone)]
pub struct Retarget {
    env: Env,
}

impl fmt::Debug for Retarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retarget")
            .field("depth", &self.env.depth())
            .finish()
    }
}

impl Retarget {
    pub(crate) fn new(env: Env) -> Self {
        Retarget { env }
    }

    /// Pin `sub` so it ignores the stack it is later run against.
    pub fn sub<X: 'static>(&self, sub: Sub<X>) -> Sub<X> {
        let pinned = self.env.clone();
        Sub::new(move |_: &Env| sub.run(&pinned))
    }
}
