//! Accumulated output.
//!
//! Every [`tell`] is folded into a [`Monoid`] accumulator. [`listen`] runs a
//! block and additionally returns what that block told; the output still
//! reaches every enclosing accumulator.
//!
//! # Example
//!
//! ```rust
//! use undertow::prelude::*;
//! use undertow::effects::writer::{self, Writer};
//!
//! type Es = Stack![Writer<Vec<&'static str>>];
//!
//! let eff = writer::tell::<_, Es, _>(vec!["start"])
//!     .then(writer::listen(writer::tell::<_, Es, _>(vec!["inner"])))
//!     .map(|((), heard)| heard);
//!
//! assert_eq!(
//!     run_pure(writer::run_writer(eff)),
//!     (vec!["inner"], vec!["start", "inner"]),
//! );
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dispatch::{interpret, send, send_higher, BoxedHandler};
use crate::eff::{pure, Eff, EffExt};
use crate::monoid::Monoid;
use crate::op::{Answer, Effect, Reply, Retarget, Sub};
use crate::send_site::SendSite;
use crate::stack::{Cons, EffectStack, Member};

/// Operations writing values of type `W`.
pub enum Writer<W> {
    /// Append to the output.
    Tell(W, Reply<()>),
    /// Run a block, then hand what it told to the continuation.
    Listen(Sub<Box<dyn FnOnce(W) -> Answer>>),
}

impl<W: fmt::Debug> fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Writer::Tell(w, _) => f.debug_tuple("Writer::Tell").field(w).finish(),
            Writer::Listen(_) => f.write_str("Writer::Listen"),
        }
    }
}

impl<W: 'static> Effect for Writer<W> {
    fn retarget(self, target: &Retarget) -> Self {
        match self {
            Writer::Listen(block) => Writer::Listen(target.sub(block)),
            tell => tell,
        }
    }
}

/// Append `w` to the output.
pub fn tell<W, Es, I>(w: W) -> impl Eff<Output = (), Stack = Es>
where
    W: 'static,
    Es: Member<Writer<W>, I>,
    I: 'static,
{
    send(move |reply| Writer::Tell(w, reply))
}

/// Run `m` and also return the output it produced.
pub fn listen<W, Es, I, M>(m: M) -> impl Eff<Output = (M::Output, W), Stack = Es>
where
    W: 'static,
    Es: Member<Writer<W>, I>,
    I: 'static,
    M: Eff<Stack = Es>,
{
    send_higher::<Writer<W>, Es, I, (M::Output, W), _>(move |reply, s| {
        Writer::Listen(s.suspend(m.map(move |a| {
            Box::new(move |w: W| reply.answer((a, w))) as Box<dyn FnOnce(W) -> Answer>
        })))
    })
}

fn append<W: Monoid>(sink: &RefCell<W>, w: W) {
    let mut slot = sink.borrow_mut();
    let current = std::mem::replace(&mut *slot, W::empty());
    *slot = current.combine(w);
}

/// A handler folding output into every accumulator in `sinks`, outermost
/// first.
fn collect<W, Es>(sinks: Vec<Rc<RefCell<W>>>) -> BoxedHandler<Writer<W>, Es>
where
    W: Monoid + Clone + 'static,
    Es: EffectStack,
{
    Box::new(
        move |op: Writer<W>, site: SendSite<Writer<W>, Es>| match op {
            Writer::Tell(w, reply) => {
                for sink in &sinks {
                    append(sink, w.clone());
                }
                pure(reply.answer(())).boxed()
            }
            Writer::Listen(block) => {
                let heard = Rc::new(RefCell::new(W::empty()));
                let mut nested = sinks.clone();
                nested.push(Rc::clone(&heard));
                site.to_eff_with(collect(nested), block)
                    .map(move |k| k(heard.replace(W::empty())))
                    .boxed()
            }
        },
    )
}

/// Handle `Writer<W>`, returning the result and the total output.
pub fn run_writer<W, Es, M>(m: M) -> impl Eff<Output = (M::Output, W), Stack = Es>
where
    W: Monoid + Clone + 'static,
    Es: EffectStack,
    M: Eff<Stack = Cons<Writer<W>, Es>>,
{
    let total = Rc::new(RefCell::new(W::empty()));
    interpret(collect::<W, Es>(vec![Rc::clone(&total)]), m)
        .map(move |a| (a, total.replace(W::empty())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::error::{self, Error};
    use crate::monoid::Sum;
    use crate::prelude::*;

    type Log = Stack![Writer<String>];

    #[test]
    fn test_tell_accumulates_in_order() {
        let eff = for_each(["a", "b", "c"], |s| tell::<_, Log, _>(s.to_string()));
        let (_, out) = run_pure(run_writer(eff));
        assert_eq!(out, "abc");
    }

    #[test]
    fn test_nested_listen_sees_only_its_block() {
        let eff = listen(
            tell::<_, Log, _>("x".to_string())
                .then(listen(tell::<_, Log, _>("y".to_string())))
                .map(|((), inner)| inner),
        );
        let ((inner, middle), total) = run_pure(run_writer(eff));
        assert_eq!(inner, "y");
        assert_eq!(middle, "xy");
        assert_eq!(total, "xy");
    }

    #[test]
    fn test_output_before_throw_is_kept() {
        type Es = Stack![Error<()>, Writer<Vec<u8>>];
        let eff = tell::<_, Es, _>(vec![1]).then(error::throw::<(), _, Es, _>(()));
        let (result, out) = run_pure(run_writer(error::run_error(eff)));
        assert_eq!(result, Err(()));
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn test_listen_reports_block_sum() {
        type Es = Stack![Writer<Sum<i64>>];
        let block = tell::<Sum<i64>, Es, _>(Sum(2)).then(tell::<Sum<i64>, Es, _>(Sum(3)));
        let eff = listen::<Sum<i64>, Es, _, _>(block)
            .zip(tell::<Sum<i64>, Es, _>(Sum(10)))
            .map(|(((), heard), ())| heard);
        assert_eq!(run_pure(run_writer(eff)), (Sum(5), Sum(15)));
    }

    #[test]
    fn test_tuple_output_counts_and_collects() {
        type Tally = (Sum<usize>, Vec<&'static str>);
        type Es = Stack![Writer<Tally>];
        let eff = for_each(["a", "bb", "ccc"], |s| {
            tell::<Tally, Es, _>((Sum(s.len()), vec![s]))
        });
        let (_, (chars, words)) = run_pure(run_writer(eff));
        assert_eq!(chars, Sum(6));
        assert_eq!(words, vec!["a", "bb", "ccc"]);
    }

    #[test]
    fn test_optional_output_stays_none_until_told() {
        type Es = Stack![Writer<Option<String>>];
        let (_, silent) = run_pure(run_writer(pure::<(), Es>(())));
        assert_eq!(silent, None);

        let eff = for_each([Some("a"), None, Some("b")], |s| {
            tell::<Option<String>, Es, _>(s.map(str::to_string))
        });
        let (_, out) = run_pure(run_writer(eff));
        assert_eq!(out, Some("ab".to_string()));
    }
}
