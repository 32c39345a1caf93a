//! Runtime effect stacks.
//!
//! An [`Env`] is what a computation actually runs against: a shared handle to
//! the [`Arena`] plus the ordered list of arena positions, one per effect of
//! the computation's type-level stack. The list is immutable. Every structural
//! operation (dropping the innermost entries, pushing a new one, selecting a
//! subset) builds a fresh list, so a stack captured by a running handler is
//! never renumbered underneath it.
//!
//! Positions are stored bottom first; type-level indices count from the top.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::arena::{Arena, Entry, Position};

/// The runtime effect stack of a computation.
#[derive(Clone)]
pub struct Env {
    arena: Rc<RefCell<Arena>>,
    stack: Rc<[Position]>,
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("stack", &&*self.stack)
            .field("arena", &*self.arena.borrow())
            .finish()
    }
}

impl Env {
    /// An empty stack over a fresh arena.
    pub(crate) fn root() -> Self {
        Env {
            arena: Rc::new(RefCell::new(Arena::new())),
            stack: Rc::from(Vec::new()),
        }
    }

    /// Number of effects in scope.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Positions in scope, outermost first.
    pub fn positions(&self) -> &[Position] {
        &self.stack
    }

    /// Number of live handler entries in the shared arena.
    pub fn live_handlers(&self) -> usize {
        self.arena.borrow().live_count()
    }

    /// Arena position of the effect `index` entries below the top.
    pub(crate) fn position_at(&self, index: usize) -> Position {
        let depth = self.stack.len();
        match depth.checked_sub(index + 1) {
            Some(slot) => self.stack[slot],
            None => panic!("effect index {index} out of range for a stack of depth {depth}"),
        }
    }

    fn with_stack(&self, stack: Vec<Position>) -> Env {
        Env {
            arena: Rc::clone(&self.arena),
            stack: Rc::from(stack),
        }
    }

    /// The position list alone, without the arena handle.
    ///
    /// Handler entries keep this instead of a whole `Env`: an entry lives in
    /// the arena, so holding the arena handle would form a cycle.
    pub(crate) fn stack(&self) -> Rc<[Position]> {
        Rc::clone(&self.stack)
    }

    /// Same arena, another position list.
    pub(crate) fn rebased(&self, stack: Rc<[Position]>) -> Env {
        Env {
            arena: Rc::clone(&self.arena),
            stack,
        }
    }

    /// Drop the `n` innermost entries.
    pub(crate) fn drop_top(&self, n: usize) -> Env {
        let keep = self
            .stack
            .len()
            .checked_sub(n)
            .unwrap_or_else(|| panic!("cannot drop {n} effects from a stack of depth {}", self.depth()));
        self.with_stack(self.stack[..keep].to_vec())
    }

    /// Push one position on top.
    pub(crate) fn push(&self, pos: Position) -> Env {
        self.push_all(std::iter::once(pos))
    }

    /// Push positions on top, the last one ending up innermost.
    pub(crate) fn push_all(&self, positions: impl IntoIterator<Item = Position>) -> Env {
        let mut stack = self.stack.to_vec();
        stack.extend(positions);
        self.with_stack(stack)
    }

    /// Positions at the given indices, first index on top.
    pub(crate) fn select(&self, indices: &[usize]) -> Vec<Position> {
        indices.iter().rev().map(|&i| self.position_at(i)).collect()
    }

    /// A stack made of the given indices of this one, first index on top.
    pub(crate) fn project(&self, indices: &[usize]) -> Env {
        self.with_stack(self.select(indices))
    }

    /// Remove the entry `index` below the top.
    pub(crate) fn remove_at(&self, index: usize) -> Env {
        let slot = self.stack.len() - 1 - index;
        let mut stack = self.stack.to_vec();
        stack.remove(slot);
        self.with_stack(stack)
    }

    /// Point every entry referring to `from` at `to`.
    pub(crate) fn substitute(&self, from: Position, to: Position) -> Env {
        let stack = self
            .stack
            .iter()
            .map(|&p| if p == from { to } else { p })
            .collect();
        self.with_stack(stack)
    }

    pub(crate) fn allocate(&self) -> Position {
        self.arena.borrow_mut().allocate()
    }

    pub(crate) fn fill(&self, pos: Position, entry: Entry) {
        self.arena.borrow_mut().fill(pos, entry);
    }

    #[cfg(test)]
    pub(crate) fn append(&self, entry: Entry) -> Position {
        self.arena.borrow_mut().append(entry)
    }

    pub(crate) fn read(&self, pos: Position) -> Entry {
        self.arena.borrow().read(pos)
    }

    pub(crate) fn release(&self, pos: Position) {
        self.arena.borrow_mut().release(pos);
    }
}

/// Releases an arena slot when the scope that owns it exits.
pub(crate) struct SlotGuard<'a> {
    env: &'a Env,
    pos: Position,
}

impl<'a> SlotGuard<'a> {
    pub(crate) fn new(env: &'a Env, pos: Position) -> Self {
        SlotGuard { env, pos }
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        trace_event!(position = %self.pos, "released handler slot");
        self.env.release(self.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(n: usize) -> Env {
        let env = Env::root();
        let positions: Vec<_> = (0..n).map(|i| env.append(Rc::new(i))).collect();
        env.push_all(positions)
    }

    #[test]
    fn test_position_at_counts_from_top() {
        let env = env_with(3);
        assert_eq!(env.position_at(0), env.positions()[2]);
        assert_eq!(env.position_at(2), env.positions()[0]);
    }

    #[test]
    fn test_drop_top_keeps_prefix() {
        let env = env_with(3);
        let dropped = env.drop_top(2);
        assert_eq!(dropped.positions(), &env.positions()[..1]);
        assert_eq!(env.depth(), 3);
    }

    #[test]
    fn test_project_puts_first_index_on_top() {
        let env = env_with(3);
        let projected = env.project(&[2, 0]);
        assert_eq!(projected.position_at(0), env.position_at(2));
        assert_eq!(projected.position_at(1), env.position_at(0));
    }

    #[test]
    fn test_substitute_replaces_every_occurrence() {
        let env = env_with(2);
        let top = env.position_at(0);
        let doubled = env.push(top);
        let fresh = doubled.append(Rc::new(9_usize));
        let swapped = doubled.substitute(top, fresh);
        assert_eq!(swapped.position_at(0), fresh);
        assert_eq!(swapped.position_at(1), fresh);
        assert_eq!(swapped.position_at(2), env.position_at(1));
    }

    #[test]
    fn test_slot_guard_releases_on_unwind() {
        let env = Env::root();
        let pos = env.append(Rc::new(()));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = SlotGuard::new(&env, pos);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(env.live_handlers(), 0);
    }
}
