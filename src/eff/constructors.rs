//! Free-standing constructors for computations.

use crate::eff::combinators::{Lazy, Pure, Sequence};
use crate::eff::trait_def::Eff;
use crate::stack::EffectStack;

/// A computation that produces `value` without sending anything.
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
///
/// assert_eq!(run_pure(pure::<_, Stack![]>("done")), "done");
/// ```
pub fn pure<T: 'static, Es: EffectStack>(value: T) -> Pure<T, Es> {
    Pure::new(value)
}

/// A computation that calls `f` when it runs.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use undertow::prelude::*;
///
/// let calls = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&calls);
/// let eff = lazy::<_, _, Stack![]>(move || counter.set(counter.get() + 1));
///
/// assert_eq!(calls.get(), 0);
/// run_pure(eff);
/// assert_eq!(calls.get(), 1);
/// ```
pub fn lazy<F, T, Es>(f: F) -> Lazy<F, Es>
where
    F: FnOnce() -> T + 'static,
    T: 'static,
    Es: EffectStack,
{
    Lazy::new(f)
}

/// Run every computation in order, collecting the outputs.
pub fn sequence<M: Eff>(items: Vec<M>) -> Sequence<M> {
    Sequence { items }
}

/// Build one computation per item and run them in order.
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
///
/// let eff = for_each(1..=3, |n| pure::<_, Stack![]>(n * 10));
/// assert_eq!(run_pure(eff), vec![10, 20, 30]);
/// ```
pub fn for_each<I, F, M>(items: I, f: F) -> Sequence<M>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> M,
    M: Eff,
{
    sequence(items.into_iter().map(f).collect())
}
