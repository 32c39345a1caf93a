//! The bottom of the stack.
//!
//! - [`run_pure`] runs a computation whose effects have all been handled
//! - [`Io`] is an effect for host side effects, handled by [`run_io`]
//!
//! Keeping host actions behind [`Io`] lets them be observed or replaced
//! like any other operation, with [`interpose`](crate::dispatch::interpose).

use crate::dispatch::{interpret, send};
use crate::eff::{lazy, Eff};
use crate::env::Env;
use crate::op::{Answer, Effect, Retarget};
use crate::send_site::SendSite;
use crate::stack::{Member, Nil};

/// Run a computation with no unhandled effects.
///
/// Each call starts a fresh handler arena.
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
///
/// assert_eq!(run_pure(pure::<_, Stack![]>(1).map(|x| x + 1)), 2);
/// ```
pub fn run_pure<M>(m: M) -> M::Output
where
    M: Eff<Stack = Nil>,
{
    m.run(&Env::root())
}

/// Host side effects.
pub enum Io {
    /// Run a host action.
    Lift(Box<dyn FnOnce() -> Answer>),
}

impl std::fmt::Debug for Io {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Io::Lift(_) => f.write_str("Io::Lift(<function>)"),
        }
    }
}

impl Effect for Io {
    fn retarget(self, _: &Retarget) -> Self {
        self
    }
}

/// Run a host action through [`Io`].
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
/// use undertow::run::{lift, run_io};
///
/// let eff = lift(|| std::env::consts::OS.len());
/// assert!(run_io(eff) > 0);
/// ```
pub fn lift<T, Es, I, F>(f: F) -> impl Eff<Output = T, Stack = Es>
where
    T: 'static,
    Es: Member<Io, I>,
    I: 'static,
    F: FnOnce() -> T + 'static,
{
    send(move |reply| Io::Lift(Box::new(move || reply.answer(f()))))
}

/// Drive a future to completion on the current thread through [`Io`].
///
/// The stack stays synchronous: the computation waits here until the
/// future resolves.
///
/// ```rust
/// use undertow::prelude::*;
/// use undertow::run::{block_on, run_io};
///
/// let eff = block_on(async { 21 * 2 });
/// assert_eq!(run_io(eff), 42);
/// ```
pub fn block_on<Fut, Es, I>(fut: Fut) -> impl Eff<Output = Fut::Output, Stack = Es>
where
    Fut: std::future::Future + 'static,
    Fut::Output: 'static,
    Es: Member<Io, I>,
    I: 'static,
{
    lift(move || futures::executor::block_on(fut))
}

/// Handle [`Io`] by performing each action, then run to completion.
pub fn run_io<M>(m: M) -> M::Output
where
    M: Eff<Stack = crate::Stack![Io]>,
{
    run_pure(interpret(
        |op: Io, _: SendSite<Io, Nil>| match op {
            Io::Lift(action) => lazy(action),
        },
        m,
    ))
}
