//! Recoverable errors.
//!
//! A thrown value abandons the rest of the computation up to the nearest
//! enclosing [`catch`] or [`run_error`] of the same installation. The unwind
//! is carried out of band with [`std::panic::resume_unwind`] (no panic hook
//! runs, nothing is printed), so every scope guard on the way out releases
//! its handler slot as usual.
//!
//! Each installation tags its unwinds; nested `run_error`s of the same
//! error type, and panics that are not thrown errors at all, pass through
//! untouched.
//!
//! # Example
//!
//! ```rust
//! use undertow::prelude::*;
//! use undertow::effects::error::{self, Error};
//!
//! fn parse<Es, I>(s: &'static str) -> impl Eff<Output = u8, Stack = Es>
//! where
//!     Es: Member<Error<String>, I>,
//!     I: 'static,
//! {
//!     error::from_result(s.parse::<u8>().map_err(|e| e.to_string()))
//! }
//!
//! type Es = Stack![Error<String>];
//!
//! let eff = error::catch(parse::<Es, _>("x"), |_: String| pure(0));
//! assert_eq!(run_pure(error::run_error(eff)), Ok(0));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::dispatch::{interpret, send, send_higher};
use crate::eff::combinators::FromEnv;
use crate::eff::{lazy, pure, Eff, EffExt};
use crate::env::Env;
use crate::op::{Answer, Effect, Retarget, Sub};
use crate::send_site::SendSite;
use crate::stack::{Cons, EffectStack, Member};

/// Operations of errors of type `Er`.
pub enum Error<Er> {
    /// Abandon the computation with an error.
    Throw(Er),
    /// Run a block; if it throws, run the recovery built from the error.
    Catch(Sub<Answer>, Box<dyn FnOnce(Er) -> Sub<Answer>>),
}

impl<Er: fmt::Debug> fmt::Debug for Error<Er> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Throw(e) => f.debug_tuple("Error::Throw").field(e).finish(),
            Error::Catch(..) => f.write_str("Error::Catch"),
        }
    }
}

impl<Er: 'static> Effect for Error<Er> {
    fn retarget(self, target: &Retarget) -> Self {
        match self {
            Error::Catch(block, recover) => {
                let target = Retarget::clone(target);
                Error::Catch(
                    target.sub(block),
                    Box::new(move |e: Er| target.sub(recover(e))),
                )
            }
            throw => throw,
        }
    }
}

/// Throw `e`.
pub fn throw<T, Er, Es, I>(e: Er) -> impl Eff<Output = T, Stack = Es>
where
    T: 'static,
    Er: 'static,
    Es: Member<Error<Er>, I>,
    I: 'static,
{
    send::<Error<Er>, Es, I, T, _>(move |_| Error::Throw(e))
}

/// Run `m`; if it throws, run `recover` with the error instead.
pub fn catch<Er, Es, I, M, F, M2>(m: M, recover: F) -> impl Eff<Output = M::Output, Stack = Es>
where
    Er: 'static,
    Es: Member<Error<Er>, I>,
    I: 'static,
    M: Eff<Stack = Es>,
    F: FnOnce(Er) -> M2 + 'static,
    M2: Eff<Output = M::Output, Stack = Es>,
{
    send_higher::<Error<Er>, Es, I, M::Output, _>(move |reply, s| {
        let (done, recovered) = reply.split();
        Error::Catch(
            s.suspend(m.answering(done)),
            Box::new(move |e: Er| s.suspend(recover(e).answering(recovered))),
        )
    })
}

/// Lift a `Result` into the error effect.
pub fn from_result<T, Er, Es, I>(result: Result<T, Er>) -> impl Eff<Output = T, Stack = Es>
where
    T: 'static,
    Er: 'static,
    Es: Member<Error<Er>, I>,
    I: 'static,
{
    match result {
        Ok(value) => pure(value).boxed(),
        Err(e) => throw::<T, Er, Es, I>(e).boxed(),
    }
}

/// Unwind payload of a thrown error; the value itself stays on this thread.
struct Thrown {
    tag: usize,
}

/// Where one installation parks the error being thrown.
struct Mailbox<Er> {
    error: RefCell<Option<Er>>,
}

impl<Er> Mailbox<Er> {
    fn tag(self: &Rc<Self>) -> usize {
        Rc::as_ptr(self) as *const () as usize
    }

    fn throw(self: &Rc<Self>, e: Er) -> ! {
        *self.error.borrow_mut() = Some(e);
        trace_event!(error = std::any::type_name::<Er>(), tag = self.tag(), "throwing");
        panic::resume_unwind(Box::new(Thrown { tag: self.tag() }))
    }

    /// Run `f`, catching errors thrown to this mailbox only.
    fn catching<T>(self: &Rc<Self>, f: impl FnOnce() -> T) -> Result<T, Er> {
        let payload = match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => return Ok(value),
            Err(payload) => payload,
        };
        let ours = payload
            .downcast_ref::<Thrown>()
            .is_some_and(|thrown| thrown.tag == self.tag());
        if ours {
            if let Some(e) = self.error.borrow_mut().take() {
                return Err(e);
            }
        }
        panic::resume_unwind(payload)
    }
}

/// Handle `Error<Er>`, returning `Err` for an uncaught throw.
pub fn run_error<Er, Es, M>(m: M) -> impl Eff<Output = Result<M::Output, Er>, Stack = Es>
where
    Er: 'static,
    Es: EffectStack,
    M: Eff<Stack = Cons<Error<Er>, Es>>,
{
    let mailbox = Rc::new(Mailbox {
        error: RefCell::new(None),
    });
    let outer = Rc::clone(&mailbox);
    let handled = interpret(
        move |op: Error<Er>, site: SendSite<Error<Er>, Es>| match op {
            Error::Throw(e) => {
                let mailbox = Rc::clone(&mailbox);
                lazy(move || -> Answer { mailbox.throw(e) }).boxed()
            }
            Error::Catch(block, recover) => {
                let mailbox = Rc::clone(&mailbox);
                FromEnv::<_, Es>::new(move |env: &Env| {
                    match mailbox.catching(|| site.to_eff(block).run(env)) {
                        Ok(answer) => answer,
                        Err(e) => site.to_eff(recover(e)).run(env),
                    }
                })
                .boxed()
            }
        },
        m,
    );
    FromEnv::<_, Es>::new(move |env: &Env| outer.catching(|| handled.run(env)))
}

/// Turn errors of type `E1` into errors of type `E2` handled further out.
pub fn map_error<E1, E2, Es, I, F, M>(f: F, m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    E1: 'static,
    E2: 'static,
    Es: Member<Error<E2>, I>,
    I: 'static,
    F: FnOnce(E1) -> E2 + 'static,
    M: Eff<Stack = Cons<Error<E1>, Es>>,
{
    run_error(m).and_then(move |result| match result {
        Ok(value) => pure(value).boxed(),
        Err(e) => throw::<M::Output, E2, Es, I>(f(e)).boxed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::state::{self, State};
    use crate::prelude::*;
    use crate::testing::live_handlers;

    type Es = Stack![Error<&'static str>];

    #[test]
    fn test_throw_abandons_rest() {
        let eff = throw::<(), _, Es, _>("stop").then(pure(1));
        assert_eq!(run_pure(run_error(eff)), Err("stop"));
    }

    #[test]
    fn test_catch_recovers() {
        let eff = catch(
            throw::<u8, _, Es, _>("bad").map(|n| n + 1),
            |e: &'static str| pure(e.len() as u8),
        );
        assert_eq!(run_pure(run_error(eff)), Ok(3));
    }

    #[test]
    fn test_catch_passes_through_success() {
        let eff = catch(pure::<_, Es>(5), |_: &'static str| pure(0));
        assert_eq!(run_pure(run_error(eff)), Ok(5));
    }

    #[test]
    fn test_rethrow_from_recovery_reaches_outer_handler() {
        let eff = catch(throw::<u8, _, Es, _>("first"), |_: &'static str| {
            throw::<u8, _, Es, _>("second")
        });
        assert_eq!(run_pure(run_error(eff)), Err("second"));
    }

    #[test]
    fn test_nested_installations_do_not_intercept_each_other() {
        type Two = Stack![Error<&'static str>, Error<&'static str>];
        let inner = throw::<u8, _, Two, There<Here>>("outer");
        let eff = run_error(run_error(inner));
        assert_eq!(run_pure(eff), Err("outer"));
    }

    #[test]
    fn test_state_changes_before_throw_are_kept_by_outer_state() {
        type Es = Stack![Error<String>, State<u32>];
        let eff = state::put::<u32, Es, _>(7)
            .then(throw::<(), _, Es, _>("oops".to_string()));
        let eff = state::run_state(0, run_error(eff));
        assert_eq!(run_pure(eff), (Err("oops".to_string()), 7));
    }

    #[test]
    fn test_throw_releases_handler_slots() {
        type Es = Stack![State<u8>, Error<&'static str>];
        let inner = state::eval_state(0, throw::<u8, _, Es, _>("gone"));
        let eff = run_error(inner).then(live_handlers::<Stack![]>());
        assert_eq!(run_pure(eff), 0);
    }

    #[test]
    fn test_map_error_converts() {
        type Es = Stack![Error<u8>, Error<String>];
        let eff = map_error(|n: u8| format!("code {n}"), throw::<(), _, Es, _>(4_u8));
        assert_eq!(run_pure(run_error(eff)), Err("code 4".to_string()));
    }

    #[test]
    fn test_foreign_panic_passes_through() {
        let eff = run_error(lazy::<_, (), Es>(|| panic!("not an error effect")));
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| run_pure(eff)));
        let payload = outcome.expect_err("panic should propagate");
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"not an error effect"));
    }
}
