//! Fresh unique names.
//!
//! [`run_fresh`] is a [`reinterpret`](crate::dispatch::reinterpret): the
//! handler keeps its counter in a private `State<u64>` that the handled
//! computation cannot see.

use std::fmt;

use crate::dispatch::{reinterpret, send};
use crate::eff::{Eff, EffExt};
use crate::effects::state::{self, State};
use crate::op::{Effect, Reply, Retarget};
use crate::send_site::SendSite;
use crate::stack::{Cons, EffectStack, Here, Member};

/// A name that no other call to [`fresh`] under the same handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unique(u64);

impl Unique {
    /// The underlying counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Unique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The fresh-name effect.
#[derive(Debug)]
pub enum Fresh {
    /// Produce a new name.
    Fresh(Reply<Unique>),
}

impl Effect for Fresh {
    fn retarget(self, _: &Retarget) -> Self {
        self
    }
}

/// A new unique name.
pub fn fresh<Es, I>() -> impl Eff<Output = Unique, Stack = Es>
where
    Es: Member<Fresh, I>,
    I: 'static,
{
    send(Fresh::Fresh)
}

/// Handle [`Fresh`] by counting up from zero.
///
/// ```rust
/// use undertow::prelude::*;
/// use undertow::effects::fresh::{fresh, run_fresh, Fresh};
///
/// let eff = fresh::<Stack![Fresh], _>().zip(fresh());
/// let (a, b) = run_pure(run_fresh(eff));
/// assert_ne!(a, b);
/// assert_eq!(b.get(), a.get() + 1);
/// ```
pub fn run_fresh<Es, M>(m: M) -> impl Eff<Output = M::Output, Stack = Es>
where
    Es: EffectStack,
    M: Eff<Stack = Cons<Fresh, Es>>,
{
    let counted = reinterpret(
        |op: Fresh, _: SendSite<Fresh, Cons<State<u64>, Es>>| match op {
            Fresh::Fresh(reply) => {
                state::state::<u64, Unique, Cons<State<u64>, Es>, Here, _>(|n| (Unique(n), n + 1))
                    .answering(reply)
            }
        },
        m,
    );
    state::eval_state(0, counted)
}
