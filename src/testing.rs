//! Testing utilities for handlers and effectful programs.
//!
//! - [`OpLog`] records what handlers saw, in order
//! - [`live_handlers`] / [`stack_depth`] observe the runtime from inside a
//!   computation
//! - [`assert_thrown!`](crate::assert_thrown) / [`assert_returned!`](crate::assert_returned)
//!   check the result of [`run_error`](crate::effects::error::run_error)
//!
//! # Example
//!
//! ```rust
//! use undertow::prelude::*;
//! use undertow::effects::error::{run_error, throw, Error};
//! use undertow::assert_thrown;
//!
//! let eff = throw::<u8, _, Stack![Error<&str>], _>("no");
//! assert_thrown!(run_pure(run_error(eff)), "no");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::eff::combinators::FromEnv;
use crate::eff::Eff;
use crate::env::Env;
use crate::stack::EffectStack;

/// A shared, append-only record of events.
///
/// Clones share the same record, so a handler closure can own one clone
/// while the test keeps another.
///
/// ```rust
/// use undertow::testing::OpLog;
///
/// let log = OpLog::new();
/// let writer = log.clone();
/// writer.push("get");
/// writer.push("put");
/// assert_eq!(log.entries(), vec!["get", "put"]);
/// ```
pub struct OpLog<T> {
    entries: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for OpLog<T> {
    fn clone(&self) -> Self {
        OpLog {
            entries: Rc::clone(&self.entries),
        }
    }
}

impl<T> Default for OpLog<T> {
    fn default() -> Self {
        OpLog {
            entries: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OpLog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.borrow().iter()).finish()
    }
}

impl<T> OpLog<T> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&self, entry: T) {
        self.entries.borrow_mut().push(entry);
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<T: Clone> OpLog<T> {
    /// Snapshot of the recorded events, oldest first.
    pub fn entries(&self) -> Vec<T> {
        self.entries.borrow().clone()
    }
}

/// A computation reporting how many handler entries are live in the arena.
///
/// ```rust
/// use undertow::prelude::*;
/// use undertow::effects::reader::run_reader;
/// use undertow::testing::live_handlers;
///
/// let inside = run_reader(0_u8, raise(live_handlers::<Stack![]>()));
/// assert_eq!(run_pure(inside), 1);
/// assert_eq!(run_pure(live_handlers::<Stack![]>()), 0);
/// ```
pub fn live_handlers<Es: EffectStack>() -> impl Eff<Output = usize, Stack = Es> {
    FromEnv::<_, Es>::new(|env: &Env| env.live_handlers())
}

/// A computation reporting the runtime depth of its own stack.
pub fn stack_depth<Es: EffectStack>() -> impl Eff<Output = usize, Stack = Es> {
    FromEnv::<_, Es>::new(|env: &Env| env.depth())
}

/// Assert that a `Result` from an error handler holds the expected error.
///
/// # Example
///
/// ```rust
/// use undertow::assert_thrown;
///
/// let result: Result<u8, &str> = Err("boom");
/// assert_thrown!(result, "boom");
/// ```
#[macro_export]
macro_rules! assert_thrown {
    ($result:expr, $expected:expr) => {
        match $result {
            Err(error) => assert_eq!(error, $expected),
            Ok(value) => panic!(
                "Expected thrown error {:?}, got returned value: {:?}",
                $expected, value
            ),
        }
    };
}

/// Assert that a `Result` from an error handler holds the expected value.
///
/// # Example
///
/// ```rust
/// use undertow::assert_returned;
///
/// let result: Result<u8, &str> = Ok(3);
/// assert_returned!(result, 3);
/// ```
#[macro_export]
macro_rules! assert_returned {
    ($result:expr, $expected:expr) => {
        match $result {
            Ok(value) => assert_eq!(value, $expected),
            Err(error) => panic!(
                "Expected returned value {:?}, got thrown error: {:?}",
                $expected, error
            ),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_op_log_clones_share_entries() {
        let log = OpLog::new();
        let other = log.clone();
        other.push(1);
        log.push(2);
        assert_eq!(other.entries(), vec![1, 2]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_stack_depth_matches_type() {
        let eff = raise_n::<Stack![Io, Io], _>(stack_depth::<Stack![]>());
        assert_eq!(run_io(subsume::<Io, _, Stack![Io], _>(eff)), 0);
        assert_eq!(run_io(stack_depth::<Stack![Io]>()), 1);
    }

    #[test]
    fn test_assert_returned_macro() {
        let result: Result<u8, String> = Ok(4);
        assert_returned!(result, 4);
    }

    #[test]
    #[should_panic(expected = "Expected thrown error")]
    fn test_assert_thrown_panics_on_value() {
        let result: Result<u8, &str> = Ok(4);
        assert_thrown!(result, "boom");
    }

    #[test]
    #[should_panic(expected = "Expected returned value")]
    fn test_assert_returned_panics_on_error() {
        let result: Result<u8, &str> = Err("boom");
        assert_returned!(result, 4);
    }
}
