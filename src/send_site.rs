//! Send-site capture: where a handled operation came from.
//!
//! Every handler invocation receives a [`SendSite`]: the stack that was
//! active where the operation was sent, plus the arena position of the
//! handler now running. Through it the handler decides, for each embedded
//! computation of a higher-order operation, which handlers that computation
//! observes:
//!
//! | Call | The embedded computation runs against |
//! |---|---|
//! | returning an `Eff<Es, _>` | the handler's own stack |
//! | [`to_eff`](SendSite::to_eff) | the sender's stack, unchanged |
//! | [`to_eff_with`](SendSite::to_eff_with) | the sender's stack, with this handler replaced |
//!
//! Running a sender computation against the handler's stack instead would
//! expose it to the handler's private effects and hide the ones installed
//! between the handler and the sender; the type of [`Sub`] rules that out.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::arena::Position;
use crate::dispatch::handler_entry;
use crate::eff::combinators::FromEnv;
use crate::eff::Eff;
use crate::env::{Env, SlotGuard};
use crate::op::{Answer, Effect, Retarget, Sub};
use crate::stack::EffectStack;

/// The capture passed to a handler of `E` running against `Es`.
pub struct SendSite<E, Es> {
    sender: Env,
    position: Position,
    _handler: PhantomData<fn() -> (E, Es)>,
}

impl<E, Es> Clone for SendSite<E, Es> {
    fn clone(&self) -> Self {
        SendSite {
            sender: self.sender.clone(),
            position: self.position,
            _handler: PhantomData,
        }
    }
}

impl<E, Es> fmt::Debug for SendSite<E, Es> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendSite")
            .field("effect", &type_name::<E>())
            .field("position", &self.position)
            .field("sender", &self.sender.positions())
            .finish()
    }
}

impl<E: Effect, Es: EffectStack> SendSite<E, Es> {
    pub(crate) fn new(sender: Env, position: Position) -> Self {
        SendSite {
            sender,
            position,
            _handler: PhantomData,
        }
    }

    /// Arena position of the handler now running.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Depth of the stack the operation was sent from.
    pub fn sender_depth(&self) -> usize {
        self.sender.depth()
    }

    /// Pin the embedded computations of `op` to the sender's stack.
    ///
    /// Required before forwarding `op`, or an operation built from it, to
    /// another handler with [`send_op`](crate::dispatch::send_op).
    /// Pinned computations keep running against the stack as it was sent,
    /// so a [`to_eff_with`](Self::to_eff_with) by the receiving handler
    /// does not reach them.
    pub fn retarget(&self, op: E) -> E {
        op.retarget(&Retarget::new(self.sender.clone()))
    }

    /// Run `sub` against the sender's stack.
    ///
    /// The result is a computation of the handler's stack; the handler can
    /// sequence it with its own operations.
    pub fn to_eff<X: 'static>(&self, sub: Sub<X>) -> impl Eff<Output = X, Stack = Es> {
        let sender = self.sender.clone();
        FromEnv::<_, Es>::new(move |_: &Env| sub.run(&sender))
    }

    /// Run `sub` against the sender's stack with this handler replaced by
    /// `handler` for the duration of the run.
    ///
    /// `handler` runs against the current handler's stack `Es`. It is
    /// installed in a fresh slot and every reference to the current handler
    /// in the sender's stack is redirected to that slot, so other holders
    /// of the sender's stack are unaffected. The slot is released when `sub`
    /// returns or unwinds.
    pub fn to_eff_with<H, R, X>(&self, handler: H, sub: Sub<X>) -> impl Eff<Output = X, Stack = Es>
    where
        H: Fn(E, SendSite<E, Es>) -> R + 'static,
        R: Eff<Output = Answer, Stack = Es>,
        X: 'static,
    {
        let sender = self.sender.clone();
        let current = self.position;
        FromEnv::<_, Es>::new(move |env: &Env| {
            let position = env.allocate();
            let _slot = SlotGuard::new(env, position);
            env.fill(position, handler_entry::<E, Es, H, R>(handler, env.stack()));
            trace_event!(
                effect = type_name::<E>(),
                replaced = %current,
                position = %position,
                "re-entering sender with substituted handler"
            );
            sub.run(&sender.substitute(current, position))
        })
    }
}
