//! Stack algebra: re-typing computations between stacks.
//!
//! These combinators install nothing. They only rearrange the runtime
//! position list a computation sees, in O(stack depth):
//!
//! - [`raise`] / [`raise_n`] - run a computation inside a larger stack
//! - [`raise_under`] - slip a new effect in beneath the top one
//! - [`inject`] - run a computation written for any subset of the stack
//! - [`subsume`] / [`subsume_n`] - merge re-declared effects into deeper copies
//!
//! # Example
//!
//! ```rust
//! use undertow::prelude::*;
//! use undertow::effects::{reader::{self, Reader}, state::{self, State}};
//!
//! fn config_len<Es, I>() -> impl Eff<Output = usize, Stack = Es>
//! where
//!     Es: Member<Reader<String>, I>,
//!     I: 'static,
//! {
//!     reader::asks(|s: &String| s.len())
//! }
//!
//! // Written for Reader alone, run where State is also in scope.
//! let eff = inject::<Stack![Reader<String>], Stack![State<u8>, Reader<String>], _, _>(
//!     config_len(),
//! );
//! let eff = reader::run_reader("four".to_string(), state::run_state(0, eff));
//! assert_eq!(run_pure(eff), (4, 0));
//! ```

use crate::eff::combinators::FromEnv;
use crate::eff::Eff;
use crate::env::Env;
use crate::op::Effect;
use crate::stack::{subset_indices, Append, Concat, Cons, EffectStack, Member, Subset};

/// Run `m` under one more effect it never uses.
pub fn raise<E, M>(m: M) -> impl Eff<Output = M::Output, Stack = Cons<E, M::Stack>>
where
    E: Effect,
    M: Eff,
{
    FromEnv::<_, Cons<E, M::Stack>>::new(move |env: &Env| m.run(&env.drop_top(1)))
}

/// Run `m` under the effects `Pre`, which it never uses.
pub fn raise_n<Pre, M>(m: M) -> impl Eff<Output = M::Output, Stack = Concat<Pre, M::Stack>>
where
    Pre: Append<M::Stack>,
    M: Eff,
{
    FromEnv::<_, Concat<Pre, M::Stack>>::new(move |env: &Env| m.run(&env.drop_top(Pre::LEN)))
}

/// Introduce `F` directly beneath the top effect `E` of `m`.
pub fn raise_under<F, E, Es, M>(m: M) -> impl Eff<Output = M::Output, Stack = Cons<E, Cons<F, Es>>>
where
    F: Effect,
    E: Effect,
    Es: EffectStack,
    M: Eff<Stack = Cons<E, Es>>,
{
    FromEnv::<_, Cons<E, Cons<F, Es>>>::new(move |env: &Env| m.run(&env.remove_at(1)))
}

/// Run `m`, written for the stack `Sub`, inside `Es`.
///
/// Every effect of `Sub` must occur in `Es`; each resolves to the matching
/// entry of `Es` at run time.
pub fn inject<Sub, Es, Is, M>(m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    Sub: EffectStack,
    Es: Subset<Sub, Is>,
    Is: 'static,
    M: Eff<Stack = Sub>,
{
    FromEnv::<_, Es>::new(move |env: &Env| {
        let indices = subset_indices::<Es, Sub, Is>();
        m.run(&env.project(&indices))
    })
}

/// Merge the top effect `E` of `m` into the copy of `E` already in `Es`.
pub fn subsume<E, I, Es, M>(m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    E: Effect,
    Es: Member<E, I>,
    I: 'static,
    M: Eff<Stack = Cons<E, Es>>,
{
    FromEnv::<_, Es>::new(move |env: &Env| {
        let position = env.position_at(<Es as Member<E, I>>::INDEX);
        m.run(&env.push(position))
    })
}

/// Merge the top effects `Pre` of `m` into their copies already in `Es`.
pub fn subsume_n<Pre, Es, Is, M>(m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    Pre: Append<Es>,
    Es: Subset<Pre, Is>,
    Is: 'static,
    M: Eff<Stack = Concat<Pre, Es>>,
{
    FromEnv::<_, Es>::new(move |env: &Env| {
        let indices = subset_indices::<Es, Pre, Is>();
        m.run(&env.push_all(env.select(&indices)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    enum Tag<const N: u8> {
        Which(Reply<u8>),
    }

    impl<const N: u8> Effect for Tag<N> {
        fn retarget(self, _: &Retarget) -> Self {
            self
        }
    }

    fn which<const N: u8, Es, I>() -> impl Eff<Output = u8, Stack = Es>
    where
        Es: Member<Tag<N>, I>,
        I: 'static,
    {
        send(Tag::<N>::Which)
    }

    fn answer_with<const N: u8, Es, M>(value: u8, m: M) -> impl Eff<Output = M::Output, Stack = Es>
    where
        Es: EffectStack,
        M: Eff<Stack = Cons<Tag<N>, Es>>,
    {
        interpret(
            move |op: Tag<N>, _: SendSite<Tag<N>, Es>| match op {
                Tag::Which(reply) => pure(reply.answer(value)),
            },
            m,
        )
    }

    #[test]
    fn test_raise_skips_top_effect() {
        let eff = raise::<Tag<1>, _>(which::<0, Stack![Tag<0>], _>());
        let eff = answer_with::<0, _, _>(7, answer_with::<1, _, _>(9, eff));
        assert_eq!(run_pure(eff), 7);
    }

    #[test]
    fn test_raise_n_skips_prefix() {
        let eff = raise_n::<Stack![Tag<1>, Tag<2>], _>(which::<0, Stack![Tag<0>], _>());
        let eff = answer_with::<0, _, _>(
            3,
            answer_with::<2, _, _>(2, answer_with::<1, _, _>(1, eff)),
        );
        assert_eq!(run_pure(eff), 3);
    }

    #[test]
    fn test_raise_under_keeps_top_effect() {
        let inner = which::<0, Stack![Tag<0>, Tag<2>], _>().zip(which::<2, _, _>());
        let eff = raise_under::<Tag<1>, _, _, _>(inner);
        let eff = answer_with::<2, _, _>(
            20,
            answer_with::<1, _, _>(10, answer_with::<0, _, _>(0, eff)),
        );
        assert_eq!(run_pure(eff), (0, 20));
    }

    #[test]
    fn test_inject_selects_matching_positions() {
        let inner = which::<2, Stack![Tag<2>, Tag<0>], _>().zip(which::<0, _, _>());
        let eff = inject::<Stack![Tag<2>, Tag<0>], Stack![Tag<0>, Tag<1>, Tag<2>], _, _>(inner);
        let eff = answer_with::<2, _, _>(
            22,
            answer_with::<1, _, _>(11, answer_with::<0, _, _>(0, eff)),
        );
        assert_eq!(run_pure(eff), (22, 0));
    }

    #[test]
    fn test_subsume_routes_top_to_deeper_copy() {
        let inner = which::<0, Stack![Tag<0>, Tag<0>], Here>();
        let eff = subsume::<Tag<0>, _, Stack![Tag<0>], _>(inner);
        assert_eq!(run_pure(answer_with::<0, _, _>(5, eff)), 5);
    }

    #[test]
    fn test_subsume_n_routes_prefix_to_deeper_copies() {
        let inner = which::<1, Stack![Tag<1>, Tag<0>, Tag<0>, Tag<1>], Here>()
            .zip(which::<0, _, There<Here>>());
        let eff = subsume_n::<Stack![Tag<1>, Tag<0>], Stack![Tag<0>, Tag<1>], _, _>(inner);
        let eff = answer_with::<1, _, _>(1, answer_with::<0, _, _>(0, eff));
        assert_eq!(run_pure(eff), (1, 0));
    }
}
