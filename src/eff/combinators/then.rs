//! Then combinator - sequences two computations, keeping the second output.

use crate::eff::trait_def::Eff;
use crate::env::Env;

/// Runs `first`, discards its output, then runs `second`.
pub struct Then<First, Second> {
    pub(crate) first: First,
    pub(crate) second: Second,
}

impl<First, Second> std::fmt::Debug for Then<First, Second> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Then")
            .field("first", &"<eff>")
            .field("second", &"<eff>")
            .finish()
    }
}

impl<First, Second> Eff for Then<First, Second>
where
    First: Eff,
    Second: Eff<Stack = First::Stack>,
{
    type Output = Second::Output;
    type Stack = First::Stack;

    fn run(self, env: &Env) -> Self::Output {
        self.first.run(env);
        self.second.run(env)
    }
}
