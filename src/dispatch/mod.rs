//! Dispatch core: sending operations and installing handlers.
//!
//! - [`send`] / [`send_higher`] / [`send_op`] - issue an operation to the
//!   handler currently installed for its effect
//! - [`interpret`] - handle the top effect in terms of the rest of the stack
//! - [`reinterpret`] / [`reinterpret_n`] - same, with effects private to the
//!   handler introduced under it
//! - [`interpose`] / [`impose`] / [`impose_n`] - wrap the handler already
//!   installed for an effect without removing the effect
//! - [`transform`] / [`translate`] - rewrite operations of one effect into
//!   operations of another
//!
//! # Example
//!
//! ```rust
//! use undertow::prelude::*;
//!
//! pub enum Counter {
//!     Increment(Reply<()>),
//!     Read(Reply<u32>),
//! }
//!
//! impl Effect for Counter {
//!     fn retarget(self, _: &Retarget) -> Self {
//!         self
//!     }
//! }
//!
//! let count = std::rc::Rc::new(std::cell::Cell::new(0));
//! let cell = std::rc::Rc::clone(&count);
//!
//! let program = send(Counter::Increment)
//!     .then(send(Counter::Increment))
//!     .then(send(Counter::Read));
//!
//! let handled = interpret(
//!     move |op: Counter, _site: SendSite<Counter, Stack![]>| match op {
//!         Counter::Increment(reply) => {
//!             cell.set(cell.get() + 1);
//!             pure(reply.answer(()))
//!         }
//!         Counter::Read(reply) => pure(reply.answer(cell.get())),
//!     },
//!     program,
//! );
//!
//! assert_eq!(run_pure(handled), 2);
//! ```

use std::any::type_name;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::arena::{Entry, Position};
use crate::eff::combinators::FromEnv;
use crate::eff::{BoxedEff, Eff};
use crate::env::{Env, SlotGuard};
use crate::op::{Answer, Effect, Reply, Sub};
use crate::send_site::SendSite;
use crate::stack::{Append, Concat, Cons, EffectStack, Here, Member};

/// A handler in boxed form.
///
/// Handlers that install themselves again for a nested region (through
/// [`SendSite::to_eff_with`]) must be nameable; this is the type they use.
///
/// ```rust,ignore
/// fn counter_from<Es: EffectStack>(n: u32) -> BoxedHandler<Counter, Es> {
///     Box::new(move |op, site| match op {
///         Counter::Read(reply) => pure(reply.answer(n)).boxed(),
///         Counter::Reset(block) => site.to_eff_with(counter_from(0), block).boxed(),
///     })
/// }
/// ```
pub type BoxedHandler<E, Es> = Box<dyn Fn(E, SendSite<E, Es>) -> BoxedEff<Es, Answer>>;

/// What the arena stores for one installed handler of `E`.
struct HandlerEntry<E> {
    call: Box<dyn Fn(E, &Env, Position) -> Answer>,
}

/// Wrap `handler` so that it runs against `home`, the stack it was
/// installed under, whatever stack the operation came from.
pub(crate) fn handler_entry<E, Hs, H, R>(handler: H, home: Rc<[Position]>) -> Entry
where
    E: Effect,
    Hs: EffectStack,
    H: Fn(E, SendSite<E, Hs>) -> R + 'static,
    R: Eff<Output = Answer, Stack = Hs>,
{
    let entry = HandlerEntry::<E> {
        call: Box::new(move |op: E, sender: &Env, position: Position| {
            let site = SendSite::new(sender.clone(), position);
            handler(op, site).run(&sender.rebased(Rc::clone(&home)))
        }),
    };
    Rc::new(entry)
}

/// Route `op` to the handler `index` entries below the top of `env`.
fn dispatch<E: Effect>(env: &Env, index: usize, op: E) -> Answer {
    let position = env.position_at(index);
    let entry = match env.read(position).downcast::<HandlerEntry<E>>() {
        Ok(entry) => entry,
        Err(_) => panic!(
            "handler slot {position} does not hold a handler for {}",
            type_name::<E>()
        ),
    };
    trace_event!(effect = type_name::<E>(), position = %position, "dispatching operation");
    (entry.call)(op, env, position)
}

/// Builds suspended computations for a higher-order operation.
///
/// Handed to the closure given to [`send_higher`]; every [`Sub`] it makes is
/// written against the sending computation's stack `Es`.
pub struct Suspender<Es> {
    _stack: PhantomData<fn() -> Es>,
}

impl<Es> Clone for Suspender<Es> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Es> Copy for Suspender<Es> {}

impl<Es> std::fmt::Debug for Suspender<Es> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suspender").finish()
    }
}

impl<Es: EffectStack> Suspender<Es> {
    /// Suspend `m` so the handler can decide where it runs.
    pub fn suspend<M>(&self, m: M) -> Sub<M::Output>
    where
        M: Eff<Stack = Es>,
    {
        Sub::new(move |env: &Env| m.run(env))
    }
}

/// Send a first-order operation.
///
/// `build` receives the reply slot and returns the operation; passing the
/// variant constructor itself is the common case:
///
/// ```rust,ignore
/// send(Counter::Read)                 // Counter::Read(Reply<u32>)
/// send(move |r| State::Put(value, r)) // State::Put(S, Reply<()>)
/// ```
pub fn send<E, Es, I, T, F>(build: F) -> impl Eff<Output = T, Stack = Es>
where
    E: Effect,
    Es: Member<E, I>,
    I: 'static,
    T: 'static,
    F: FnOnce(Reply<T>) -> E + 'static,
{
    send_higher::<E, Es, I, T, _>(move |reply, _| build(reply))
}

/// Send an operation that embeds computations.
///
/// ```rust,ignore
/// send_higher(move |reply, s| Reader::Local(Box::new(f), s.suspend(m.answering(reply))))
/// ```
pub fn send_higher<E, Es, I, T, F>(build: F) -> impl Eff<Output = T, Stack = Es>
where
    E: Effect,
    Es: Member<E, I>,
    I: 'static,
    T: 'static,
    F: FnOnce(Reply<T>, Suspender<Es>) -> E + 'static,
{
    FromEnv::<_, Es>::new(move |env: &Env| {
        let op = build(
            Reply::new(),
            Suspender {
                _stack: PhantomData,
            },
        );
        dispatch(env, <Es as Member<E, I>>::INDEX, op).into_value::<T>()
    })
}

/// Send an already built operation and return the raw answer.
///
/// Forwarding handlers use this to pass an operation on; the operation's
/// embedded computations should be pinned with
/// [`SendSite::retarget`] first.
pub fn send_op<E, Es, I>(op: E) -> impl Eff<Output = Answer, Stack = Es>
where
    E: Effect,
    Es: Member<E, I>,
    I: 'static,
{
    FromEnv::<_, Es>::new(move |env: &Env| dispatch(env, <Es as Member<E, I>>::INDEX, op))
}

/// Install `handler` in a new slot, run `m` on `inner(slot)`, release.
fn install<E, Hs, H, R, T>(
    env: &Env,
    handler: H,
    inner: impl FnOnce(Position) -> Env,
    m: impl FnOnce(&Env) -> T,
) -> T
where
    E: Effect,
    Hs: EffectStack,
    H: Fn(E, SendSite<E, Hs>) -> R + 'static,
    R: Eff<Output = Answer, Stack = Hs>,
{
    let position = env.allocate();
    let _slot = SlotGuard::new(env, position);
    env.fill(position, handler_entry::<E, Hs, H, R>(handler, env.stack()));
    debug_event!(effect = type_name::<E>(), position = %position, "installed handler");
    let result = m(&inner(position));
    debug_event!(effect = type_name::<E>(), position = %position, "uninstalling handler");
    result
}

/// Handle the top effect `E` of `m` with `handler`.
///
/// The handler runs against the remaining stack `Es`. The installation is
/// scoped to this run of `m`: it is removed when `m` returns or unwinds.
pub fn interpret<E, Es, H, R, M>(handler: H, m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    E: Effect,
    Es: EffectStack,
    H: Fn(E, SendSite<E, Es>) -> R + 'static,
    R: Eff<Output = Answer, Stack = Es>,
    M: Eff<Stack = Cons<E, Es>>,
{
    FromEnv::<_, Es>::new(move |env: &Env| {
        install::<E, Es, H, R, _>(env, handler, |pos| env.push(pos), |inner| m.run(inner))
    })
}

/// Handle `E` with a handler that may use one new effect `E2`.
///
/// `E2` sits on top of the result stack and is invisible to `m`.
pub fn reinterpret<E2, E, Es, H, R, M>(
    handler: H,
    m: M,
) -> impl Eff<Output = M::Output, Stack = Cons<E2, Es>>
where
    E2: Effect,
    E: Effect,
    Es: EffectStack,
    H: Fn(E, SendSite<E, Cons<E2, Es>>) -> R + 'static,
    R: Eff<Output = Answer, Stack = Cons<E2, Es>>,
    M: Eff<Stack = Cons<E, Es>>,
{
    FromEnv::<_, Cons<E2, Es>>::new(move |env: &Env| {
        install::<E, Cons<E2, Es>, H, R, _>(
            env,
            handler,
            |pos| env.drop_top(1).push(pos),
            |inner| m.run(inner),
        )
    })
}

/// Handle `E` with a handler that may use the new effects `New`.
///
/// ```rust,ignore
/// // Handler private state through State<u64>, plus a log through Writer<Vec<String>>.
/// reinterpret_n::<Stack![State<u64>, Writer<Vec<String>>], _, _, _, _, _>(handler, m)
/// ```
pub fn reinterpret_n<New, E, Es, H, R, M>(
    handler: H,
    m: M,
) -> impl Eff<Output = M::Output, Stack = Concat<New, Es>>
where
    New: Append<Es>,
    E: Effect,
    Es: EffectStack,
    H: Fn(E, SendSite<E, Concat<New, Es>>) -> R + 'static,
    R: Eff<Output = Answer, Stack = Concat<New, Es>>,
    M: Eff<Stack = Cons<E, Es>>,
{
    FromEnv::<_, Concat<New, Es>>::new(move |env: &Env| {
        install::<E, Concat<New, Es>, H, R, _>(
            env,
            handler,
            |pos| env.drop_top(New::LEN).push(pos),
            |inner| m.run(inner),
        )
    })
}

/// Install `handler` in a fresh slot and run `m` on `base` with the entry at
/// `index` redirected to that slot.
///
/// The wrapper itself runs against `env`, where `E` still resolves to the
/// previous handler, so [`send_op`] from inside the wrapper reaches it.
/// Stacks captured outside the region, including the stacks of
/// handlers installed further out, keep pointing at the previous handler.
/// The slot is released when `m` returns or unwinds.
fn overriding<E, Hs, H, R, T>(
    env: &Env,
    base: &Env,
    index: usize,
    handler: H,
    m: impl FnOnce(&Env) -> T,
) -> T
where
    E: Effect,
    Hs: EffectStack,
    H: Fn(E, SendSite<E, Hs>) -> R + 'static,
    R: Eff<Output = Answer, Stack = Hs>,
{
    let previous = base.position_at(index);
    let position = env.allocate();
    let _slot = SlotGuard::new(env, position);
    env.fill(position, handler_entry::<E, Hs, H, R>(handler, env.stack()));
    debug_event!(
        effect = type_name::<E>(),
        position = %position,
        wraps = %previous,
        "interposed handler"
    );
    m(&base.substitute(previous, position))
}

/// Wrap the handler currently installed for `E` while `m` runs.
///
/// The wrapper sees every `E` operation `m` sends and may forward it to the
/// previous handler with [`send_op`]. Only the region's own stack sees the
/// wrapper: a handler installed outside the region, or a sender stack
/// captured outside it and re-entered with [`SendSite::to_eff`], still
/// reaches the previous handler. The wrapper is removed when `m` returns or unwinds.
pub fn interpose<E, I, Es, H, R, M>(handler: H, m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    E: Effect,
    Es: Member<E, I>,
    I: 'static,
    H: Fn(E, SendSite<E, Es>) -> R + 'static,
    R: Eff<Output = Answer, Stack = Es>,
    M: Eff<Stack = Es>,
{
    FromEnv::<_, Es>::new(move |env: &Env| {
        overriding::<E, Es, H, R, _>(env, env, <Es as Member<E, I>>::INDEX, handler, |inner| {
            m.run(inner)
        })
    })
}

/// Like [`interpose`], with one new effect `E2` private to the wrapper.
pub fn impose<E2, E, I, Es, H, R, M>(
    handler: H,
    m: M,
) -> impl Eff<Output = M::Output, Stack = Cons<E2, Es>>
where
    E2: Effect,
    E: Effect,
    Es: Member<E, I>,
    I: 'static,
    H: Fn(E, SendSite<E, Cons<E2, Es>>) -> R + 'static,
    R: Eff<Output = Answer, Stack = Cons<E2, Es>>,
    M: Eff<Stack = Es>,
{
    FromEnv::<_, Cons<E2, Es>>::new(move |env: &Env| {
        let base = env.drop_top(1);
        overriding::<E, Cons<E2, Es>, H, R, _>(
            env,
            &base,
            <Es as Member<E, I>>::INDEX,
            handler,
            |inner| m.run(inner),
        )
    })
}

/// Like [`interpose`], with the new effects `New` private to the wrapper.
pub fn impose_n<New, E, I, Es, H, R, M>(
    handler: H,
    m: M,
) -> impl Eff<Output = M::Output, Stack = Concat<New, Es>>
where
    New: Append<Es>,
    E: Effect,
    Es: Member<E, I>,
    I: 'static,
    H: Fn(E, SendSite<E, Concat<New, Es>>) -> R + 'static,
    R: Eff<Output = Answer, Stack = Concat<New, Es>>,
    M: Eff<Stack = Es>,
{
    FromEnv::<_, Concat<New, Es>>::new(move |env: &Env| {
        let base = env.drop_top(New::LEN);
        overriding::<E, Concat<New, Es>, H, R, _>(
            env,
            &base,
            <Es as Member<E, I>>::INDEX,
            handler,
            |inner| m.run(inner),
        )
    })
}

/// Handle `E` by rewriting each operation into one of `E2`, already in scope.
///
/// Embedded computations keep running against the stack they were sent
/// from.
pub fn transform<E, E2, I, Es, F, M>(f: F, m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    E: Effect,
    E2: Effect,
    Es: Member<E2, I>,
    I: 'static,
    F: Fn(E) -> E2 + 'static,
    M: Eff<Stack = Cons<E, Es>>,
{
    interpret(
        move |op: E, site: SendSite<E, Es>| send_op::<E2, Es, I>(f(site.retarget(op))),
        m,
    )
}

/// Handle `E` by rewriting each operation into one of a new effect `E2`.
pub fn translate<E, E2, Es, F, M>(f: F, m: M) -> impl Eff<Output = M::Output, Stack = Cons<E2, Es>>
where
    E: Effect,
    E2: Effect,
    Es: EffectStack,
    F: Fn(E) -> E2 + 'static,
    M: Eff<Stack = Cons<E, Es>>,
{
    reinterpret(
        move |op: E, site: SendSite<E, Cons<E2, Es>>| {
            send_op::<E2, Cons<E2, Es>, Here>(f(site.retarget(op)))
        },
        m,
    )
}
