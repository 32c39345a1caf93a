//! Zip combinator - runs two computations in order and pairs their outputs.

use crate::eff::trait_def::Eff;
use crate::env::Env;

/// Runs `first` then `second`, producing both outputs.
///
/// # Example
///
/// ```rust
/// use undertow::prelude::*;
///
/// let eff = pure::<_, Stack![]>(1).zip(pure("one"));
/// assert_eq!(run_pure(eff), (1, "one"));
/// ```
pub struct Zip<First, Second> {
    pub(crate) first: First,
    pub(crate) second: Second,
}

impl<First, Second> std::fmt::Debug for Zip<First, Second> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zip")
            .field("first", &"<eff>")
            .field("second", &"<eff>")
            .finish()
    }
}

impl<First, Second> Eff for Zip<First, Second>
where
    First: Eff,
    Second: Eff<Stack = First::Stack>,
{
    type Output = (First::Output, Second::Output);
    type Stack = First::Stack;

    fn run(self, env: &Env) -> Self::Output {
        let a = self.first.run(env);
        let b = self.second.run(env);
        (a, b)
    }
}
