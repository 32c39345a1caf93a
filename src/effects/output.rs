//! A stream of emitted values.
//!
//! Handlers decide where the stream goes: into a `Vec`, nowhere, or into a
//! [`Writer`] by rewriting each operation.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dispatch::{interpret, send, transform, translate};
use crate::eff::{pure, Eff, EffExt};
use crate::effects::writer::Writer;
use crate::op::{Effect, Reply, Retarget};
use crate::send_site::SendSite;
use crate::stack::{Cons, EffectStack, Member};

/// Emit values of type `O`.
#[derive(Debug)]
pub enum Output<O> {
    /// Emit one value.
    Output(O, Reply<()>),
}

impl<O: 'static> Effect for Output<O> {
    fn retarget(self, _: &Retarget) -> Self {
        self
    }
}

/// Emit `o`.
pub fn output<O, Es, I>(o: O) -> impl Eff<Output = (), Stack = Es>
where
    O: 'static,
    Es: Member<Output<O>, I>,
    I: 'static,
{
    send(move |reply| Output::Output(o, reply))
}

/// Collect every emitted value, in order.
///
/// ```rust
/// use undertow::prelude::*;
/// use undertow::effects::output::{output, output_to_vec, Output};
///
/// let eff = for_each(1..=3, |n| output::<_, Stack![Output<i32>], _>(n));
/// let (_, out) = run_pure(output_to_vec(eff));
/// assert_eq!(out, vec![1, 2, 3]);
/// ```
pub fn output_to_vec<O, Es, M>(m: M) -> impl Eff<Output = (M::Output, Vec<O>), Stack = Es>
where
    O: 'static,
    Es: EffectStack,
    M: Eff<Stack = Cons<Output<O>, Es>>,
{
    let out = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&out);
    interpret(
        move |op: Output<O>, _: SendSite<Output<O>, Es>| match op {
            Output::Output(o, reply) => {
                sink.borrow_mut().push(o);
                pure(reply.answer(()))
            }
        },
        m,
    )
    .map(move |a| (a, out.take()))
}

/// Discard every emitted value.
pub fn ignore_output<O, Es, M>(m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    O: 'static,
    Es: EffectStack,
    M: Eff<Stack = Cons<Output<O>, Es>>,
{
    interpret(
        |op: Output<O>, _: SendSite<Output<O>, Es>| match op {
            Output::Output(_, reply) => pure(reply.answer(())),
        },
        m,
    )
}

/// Turn the stream into a new `Writer<Vec<O>>` effect.
pub fn output_to_writer<O, Es, M>(
    m: M,
) -> impl Eff<Output = M::Output, Stack = Cons<Writer<Vec<O>>, Es>>
where
    O: 'static,
    Es: EffectStack,
    M: Eff<Stack = Cons<Output<O>, Es>>,
{
    translate(
        |op: Output<O>| match op {
            Output::Output(o, reply) => Writer::Tell(vec![o], reply),
        },
        m,
    )
}

/// Send the stream to a `Writer<Vec<O>>` already in scope.
pub fn output_through_writer<O, Es, I, M>(m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    O: 'static,
    Es: Member<Writer<Vec<O>>, I>,
    I: 'static,
    M: Eff<Stack = Cons<Output<O>, Es>>,
{
    transform(
        |op: Output<O>| match op {
            Output::Output(o, reply) => Writer::Tell(vec![o], reply),
        },
        m,
    )
}
