//! Type-level effect stacks.
//!
//! A computation's effect stack is a type-level list: [`Cons<E, Tail>`] puts
//! the effect `E` on top of `Tail`, and [`Nil`] is the empty stack. The head
//! is the innermost effect, the one installed most recently. The
//! [`Stack!`](crate::Stack) macro spells a stack from top to bottom:
//!
//! ```rust
//! use undertow::prelude::*;
//! use undertow::effects::{reader::Reader, state::State};
//!
//! type App = Stack![State<i32>, Reader<String>];
//! assert_eq!(<App as EffectStack>::LEN, 2);
//! ```
//!
//! Membership and subset relations are traits over these lists, so an
//! operation can only be sent, or a computation injected, when the relation
//! holds at compile time. The traits also yield the runtime indices the
//! dispatcher uses to find handler positions in an [`Env`](crate::env::Env).
//!
//! # Duplicate effects
//!
//! When the same effect occurs twice, [`Member`] has two solutions and the
//! compiler asks for the index type. Name it explicitly (`Here`,
//! `There<Here>`, ...) to reach an outer occurrence, or merge the copies with
//! [`subsume`](crate::algebra::subsume).

use std::marker::PhantomData;

use crate::op::Effect;

/// The empty effect stack.
#[derive(Debug)]
pub enum Nil {}

/// `E` on top of `Tail`.
pub struct Cons<E, Tail>(PhantomData<fn() -> (E, Tail)>);

impl<E, Tail> std::fmt::Debug for Cons<E, Tail> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(std::any::type_name::<Self>())
    }
}

/// A type-level list of effects.
pub trait EffectStack: 'static {
    /// Number of effects in the stack.
    const LEN: usize;
}

impl EffectStack for Nil {
    const LEN: usize = 0;
}

impl<E: Effect, Tail: EffectStack> EffectStack for Cons<E, Tail> {
    const LEN: usize = 1 + Tail::LEN;
}

/// Index: the effect is on top.
#[derive(Debug)]
pub enum Here {}

/// Index: the effect is somewhere below the top.
pub struct There<I>(PhantomData<fn() -> I>);

impl<I> std::fmt::Debug for There<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(std::any::type_name::<Self>())
    }
}

/// Proof that `E` occurs in the stack at index `I`.
///
/// `I` is inferred whenever `E` occurs exactly once.
pub trait Member<E: Effect, I>: EffectStack {
    /// Distance of `E` from the top of the stack.
    const INDEX: usize;
}

impl<E: Effect, Tail: EffectStack> Member<E, Here> for Cons<E, Tail> {
    const INDEX: usize = 0;
}

impl<E: Effect, H: Effect, Tail, I> Member<E, There<I>> for Cons<H, Tail>
where
    Tail: Member<E, I>,
{
    const INDEX: usize = 1 + <Tail as Member<E, I>>::INDEX;
}

/// Proof that every effect of `Sub` occurs in the stack.
///
/// `Is` collects one [`Member`] index per effect of `Sub`. Relative order is
/// not required to match.
pub trait Subset<Sub, Is>: EffectStack {
    /// Push the index of each effect of `Sub`, top first.
    fn indices(out: &mut Vec<usize>);
}

impl<Es: EffectStack> Subset<Nil, Nil> for Es {
    fn indices(_out: &mut Vec<usize>) {}
}

impl<E: Effect, SubTail, Es, I, Is> Subset<Cons<E, SubTail>, (I, Is)> for Es
where
    Es: Member<E, I> + Subset<SubTail, Is>,
{
    fn indices(out: &mut Vec<usize>) {
        out.push(<Es as Member<E, I>>::INDEX);
        <Es as Subset<SubTail, Is>>::indices(out);
    }
}

/// Type-level concatenation: `Self ++ Es`.
pub trait Append<Es: EffectStack>: EffectStack {
    /// The concatenated stack.
    type Output: EffectStack;
}

impl<Es: EffectStack> Append<Es> for Nil {
    type Output = Es;
}

impl<E: Effect, Tail: Append<Es>, Es: EffectStack> Append<Es> for Cons<E, Tail> {
    type Output = Cons<E, <Tail as Append<Es>>::Output>;
}

/// `Pre ++ Es`.
pub type Concat<Pre, Es> = <Pre as Append<Es>>::Output;

/// Index list of `Sub` inside `Es`, top first.
pub(crate) fn subset_indices<Es, Sub, Is>() -> Vec<usize>
where
    Es: Subset<Sub, Is>,
{
    let mut out = Vec::new();
    <Es as Subset<Sub, Is>>::indices(&mut out);
    out
}

/// Build an effect stack type, innermost effect first.
///
/// ```rust
/// use undertow::prelude::*;
/// use undertow::effects::state::State;
///
/// fn depth<Es: EffectStack>() -> usize {
///     Es::LEN
/// }
///
/// assert_eq!(depth::<Stack![]>(), 0);
/// assert_eq!(depth::<Stack![State<u8>, State<u16>]>(), 2);
/// ```
#[macro_export]
macro_rules! Stack {
    [] => { $crate::stack::Nil };
    [$head:ty $(, $tail:ty)* $(,)?] => {
        $crate::stack::Cons<$head, $crate::Stack![$($tail),*]>
    };
}
