//! Handler arena - growable storage for installed handler entries.
//!
//! Every interpretation scope stores its handler in one slot of the arena and
//! refers to it through a [`Position`]. Slots are addressed by index, so
//! growing the arena never invalidates an outstanding position. Releasing a
//! slot bumps its generation: a position that escaped its scope no longer
//! matches and any access through it aborts loudly.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use undertow::arena::Arena;
//!
//! let mut arena = Arena::new();
//! let pos = arena.allocate();
//! arena.fill(pos, Rc::new(1_u32));
//! assert_eq!(arena.read(pos).downcast::<u32>().ok().as_deref(), Some(&1));
//!
//! arena.release(pos);
//! assert!(!arena.is_live(pos));
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A type-erased handler entry stored in the arena.
pub type Entry = Rc<dyn Any>;

/// Stable token naming one arena slot.
///
/// Positions are `Copy` and compare by index and generation, so a position
/// kept past the release of its slot never aliases the slot's next occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    index: u32,
    generation: u32,
}

impl Position {
    /// Slot index inside the arena.
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the slot this position was issued for.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.generation)
    }
}

struct Slot {
    generation: u32,
    live: bool,
    entry: Option<Entry>,
}

/// Growable store of handler entries.
///
/// Slots are reused through a free list once released. All operations are
/// O(1) amortized.
#[derive(Default)]
pub struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("slots", &self.slots.len())
            .field("live", &self.live_count())
            .finish()
    }
}

impl Arena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slot without filling it.
    ///
    /// Reading the slot before [`fill`](Arena::fill) is a contract violation.
    pub fn allocate(&mut self) -> Position {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.live = true;
                Position {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len())
                    .unwrap_or_else(|_| panic!("handler arena exhausted"));
                self.slots.push(Slot {
                    generation: 0,
                    live: true,
                    entry: None,
                });
                Position {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Fill a reserved slot.
    pub fn fill(&mut self, pos: Position, entry: Entry) {
        self.slot_mut(pos).entry = Some(entry);
    }

    /// Allocate and fill a slot in one step.
    pub fn append(&mut self, entry: Entry) -> Position {
        let pos = self.allocate();
        self.fill(pos, entry);
        pos
    }

    /// Replace the entry of a filled slot, returning the previous one.
    ///
    /// The caller owns the previous entry and must put it back when the
    /// region that needed the substitute ends.
    pub fn overwrite(&mut self, pos: Position, entry: Entry) -> Entry {
        let slot = self.slot_mut(pos);
        match slot.entry.replace(entry) {
            Some(previous) => previous,
            None => panic!("overwrite of unfilled handler slot {pos}"),
        }
    }

    /// Read the entry stored at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if the slot was released or never filled.
    pub fn read(&self, pos: Position) -> Entry {
        match self.slot(pos).entry {
            Some(ref entry) => Rc::clone(entry),
            None => panic!("read of unfilled handler slot {pos}"),
        }
    }

    /// Release a slot so its index can be reused.
    pub fn release(&mut self, pos: Position) {
        let slot = self.slot_mut(pos);
        slot.entry = None;
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(pos.index);
    }

    /// Whether `pos` still names a live slot.
    pub fn is_live(&self, pos: Position) -> bool {
        self.slots
            .get(pos.index())
            .is_some_and(|slot| slot.live && slot.generation == pos.generation)
    }

    /// Number of live slots.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn slot(&self, pos: Position) -> &Slot {
        match self.slots.get(pos.index()) {
            Some(slot) if slot.live && slot.generation == pos.generation => slot,
            _ => panic!("stale handler position {pos}: its scope has already exited"),
        }
    }

    fn slot_mut(&mut self, pos: Position) -> &mut Slot {
        match self.slots.get_mut(pos.index()) {
            Some(slot) if slot.live && slot.generation == pos.generation => slot,
            _ => panic!("stale handler position {pos}: its scope has already exited"),
        }
    }
}
