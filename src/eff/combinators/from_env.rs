//! Raw access to the runtime stack, for the crate's own combinators.

use std::marker::PhantomData;

use crate::eff::trait_def::Eff;
use crate::env::Env;
use crate::stack::EffectStack;

pub(crate) struct FromEnv<F, Es> {
    f: F,
    _stack: PhantomData<fn() -> Es>,
}

impl<F, Es> FromEnv<F, Es> {
    pub(crate) fn new(f: F) -> Self {
        FromEnv {
            f,
            _stack: PhantomData,
        }
    }
}

impl<F, T, Es> Eff for FromEnv<F, Es>
where
    F: FnOnce(&Env) -> T + 'static,
    T: 'static,
    Es: EffectStack,
{
    type Output = T;
    type Stack = Es;

    fn run(self, env: &Env) -> T {
        (self.f)(env)
    }
}
