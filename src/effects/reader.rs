//! Read-only context, with scoped overrides.
//!
//! [`local`] is higher-order: the handler re-installs itself with a modified
//! value for the embedded block only, through
//! [`SendSite::to_eff_with`](crate::send_site::SendSite::to_eff_with). Other
//! handlers installed between the reader and the block stay in effect.
//!
//! # Example
//!
//! ```rust
//! use undertow::prelude::*;
//! use undertow::effects::reader::{self, Reader};
//!
//! type Es = Stack![Reader<u32>];
//!
//! let eff = reader::ask::<u32, Es, _>()
//!     .zip(reader::local(|n: &u32| n * 2, reader::ask::<u32, Es, _>()))
//!     .zip(reader::ask::<u32, Es, _>());
//!
//! assert_eq!(run_pure(reader::run_reader(21, eff)), ((21, 42), 21));
//! ```

use std::fmt;

use crate::dispatch::{interpret, send, send_higher, BoxedHandler};
use crate::eff::{pure, Eff, EffExt};
use crate::op::{Answer, Effect, Reply, Retarget, Sub};
use crate::send_site::SendSite;
use crate::stack::{Cons, EffectStack, Member};

/// Operations on a read-only value of type `R`.
pub enum Reader<R> {
    /// Read the value.
    Ask(Reply<R>),
    /// Run a block with the value transformed.
    Local(Box<dyn FnOnce(&R) -> R>, Sub<Answer>),
}

impl<R> fmt::Debug for Reader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reader::Ask(_) => f.write_str("Reader::Ask"),
            Reader::Local(..) => f.write_str("Reader::Local"),
        }
    }
}

impl<R: 'static> Effect for Reader<R> {
    fn retarget(self, target: &Retarget) -> Self {
        match self {
            Reader::Local(f, block) => Reader::Local(f, target.sub(block)),
            ask => ask,
        }
    }
}

/// Read the value.
pub fn ask<R, Es, I>() -> impl Eff<Output = R, Stack = Es>
where
    R: 'static,
    Es: Member<Reader<R>, I>,
    I: 'static,
{
    send(Reader::Ask)
}

/// Read a projection of the value.
pub fn asks<R, A, Es, I, F>(f: F) -> impl Eff<Output = A, Stack = Es>
where
    R: 'static,
    A: 'static,
    Es: Member<Reader<R>, I>,
    I: 'static,
    F: FnOnce(&R) -> A + 'static,
{
    ask::<R, Es, I>().map(move |r| f(&r))
}

/// Run `m` with the value replaced by `f(value)`.
pub fn local<R, Es, I, F, M>(f: F, m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    R: 'static,
    Es: Member<Reader<R>, I>,
    I: 'static,
    F: FnOnce(&R) -> R + 'static,
    M: Eff<Stack = Es>,
{
    send_higher::<Reader<R>, Es, I, M::Output, _>(move |reply, s| {
        Reader::Local(Box::new(f), s.suspend(m.answering(reply)))
    })
}

fn serve<R, Es>(value: R) -> BoxedHandler<Reader<R>, Es>
where
    R: Clone + 'static,
    Es: EffectStack,
{
    Box::new(
        move |op: Reader<R>, site: SendSite<Reader<R>, Es>| match op {
            Reader::Ask(reply) => pure(reply.answer(value.clone())).boxed(),
            Reader::Local(f, block) => site.to_eff_with(serve(f(&value)), block).boxed(),
        },
    )
}

/// Handle `Reader<R>` by serving `value`.
pub fn run_reader<R, Es, M>(value: R, m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    R: Clone + 'static,
    Es: EffectStack,
    M: Eff<Stack = Cons<Reader<R>, Es>>,
{
    interpret(serve::<R, Es>(value), m)
}
