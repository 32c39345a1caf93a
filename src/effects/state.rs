//! Mutable state threaded through a computation.
//!
//! # Example
//!
//! ```rust
//! use undertow::prelude::*;
//! use undertow::effects::state::{self, State};
//!
//! let eff = state::get::<Vec<u8>, Stack![State<Vec<u8>>], _>()
//!     .and_then(|mut v| {
//!         v.push(3);
//!         state::put(v)
//!     })
//!     .then(state::gets(|v: &Vec<u8>| v.len()));
//!
//! assert_eq!(run_pure(state::run_state(vec![1, 2], eff)), (3, vec![1, 2, 3]));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dispatch::{interpret, send};
use crate::eff::{pure, Eff, EffExt};
use crate::op::{Answer, Effect, Reply, Retarget};
use crate::send_site::SendSite;
use crate::stack::{Cons, EffectStack, Member};

/// Operations on a state of type `S`.
pub enum State<S> {
    /// Read the current state.
    Get(Reply<S>),
    /// Replace the state.
    Put(S, Reply<()>),
    /// Replace the state with a function of it, producing a result as well.
    Modify(Box<dyn FnOnce(S) -> (Answer, S)>),
}

impl<S> fmt::Debug for State<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Get(_) => f.write_str("State::Get"),
            State::Put(..) => f.write_str("State::Put"),
            State::Modify(_) => f.write_str("State::Modify"),
        }
    }
}

impl<S: 'static> Effect for State<S> {
    fn retarget(self, _: &Retarget) -> Self {
        self
    }
}

/// Read the current state.
pub fn get<S, Es, I>() -> impl Eff<Output = S, Stack = Es>
where
    S: 'static,
    Es: Member<State<S>, I>,
    I: 'static,
{
    send(State::Get)
}

/// Replace the state.
pub fn put<S, Es, I>(s: S) -> impl Eff<Output = (), Stack = Es>
where
    S: 'static,
    Es: Member<State<S>, I>,
    I: 'static,
{
    send(move |reply| State::Put(s, reply))
}

/// Atomically replace the state with `f(state).1` and return `f(state).0`.
pub fn state<S, A, Es, I, F>(f: F) -> impl Eff<Output = A, Stack = Es>
where
    S: 'static,
    A: 'static,
    Es: Member<State<S>, I>,
    I: 'static,
    F: FnOnce(S) -> (A, S) + 'static,
{
    send(move |reply: Reply<A>| {
        State::Modify(Box::new(move |s| {
            let (a, next) = f(s);
            (reply.answer(a), next)
        }))
    })
}

/// Apply `f` to the state.
pub fn modify<S, Es, I, F>(f: F) -> impl Eff<Output = (), Stack = Es>
where
    S: 'static,
    Es: Member<State<S>, I>,
    I: 'static,
    F: FnOnce(S) -> S + 'static,
{
    state::<S, (), Es, I, _>(move |s| ((), f(s)))
}

/// Read a projection of the state.
pub fn gets<S, A, Es, I, F>(f: F) -> impl Eff<Output = A, Stack = Es>
where
    S: 'static,
    A: 'static,
    Es: Member<State<S>, I>,
    I: 'static,
    F: FnOnce(&S) -> A + 'static,
{
    state::<S, A, Es, I, _>(move |s| (f(&s), s))
}

fn step<S: Clone + 'static>(cell: &RefCell<S>, op: State<S>) -> Answer {
    match op {
        State::Get(reply) => reply.answer(cell.borrow().clone()),
        State::Put(s, reply) => {
            *cell.borrow_mut() = s;
            reply.answer(())
        }
        State::Modify(f) => {
            let current = cell.borrow().clone();
            let (answer, next) = f(current);
            *cell.borrow_mut() = next;
            answer
        }
    }
}

/// Handle `State<S>` starting from `initial`; returns the result and the
/// final state.
pub fn run_state<S, Es, M>(initial: S, m: M) -> impl Eff<Output = (M::Output, S), Stack = Es>
where
    S: Clone + 'static,
    Es: EffectStack,
    M: Eff<Stack = Cons<State<S>, Es>>,
{
    let cell = Rc::new(RefCell::new(initial));
    let handle = Rc::clone(&cell);
    interpret(
        move |op: State<S>, _: SendSite<State<S>, Es>| pure(step(&handle, op)),
        m,
    )
    .map(move |a| (a, cell.borrow().clone()))
}

/// Like [`run_state`], keeping only the result.
pub fn eval_state<S, Es, M>(initial: S, m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    S: Clone + 'static,
    Es: EffectStack,
    M: Eff<Stack = Cons<State<S>, Es>>,
{
    run_state(initial, m).map(|(a, _)| a)
}

/// Like [`run_state`], keeping only the final state.
pub fn exec_state<S, Es, M>(initial: S, m: M) -> impl Eff<Output = S, Stack = Es>
where
    S: Clone + 'static,
    Es: EffectStack,
    M: Eff<Stack = Cons<State<S>, Es>>,
{
    run_state(initial, m).map(|(_, s)| s)
}
