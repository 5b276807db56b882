//! Raw index slots and the strongly-typed [`IslandId`].
//!
//! Island outputs live in flat `i32` slot buffers so they can be handed to
//! a solver without conversion. A slot holds either an element index or
//! the [`NONE`] sentinel. The helpers here are the only place slots are
//! decoded.

use std::fmt;

/// Sentinel stored in an index slot: no island, no next element, or the
/// static world tree.
pub const NONE: i32 = -1;

/// Identifies a constraint island produced by one decomposition call.
///
/// Island ids are contiguous: `IslandId(0)..IslandId(nisland - 1)`, numbered
/// in order of each island's lowest tree index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IslandId(pub u32);

impl IslandId {
    /// Decode an island slot. Negative slots decode to `None`.
    pub fn from_slot(slot: i32) -> Option<Self> {
        u32::try_from(slot).ok().map(Self)
    }

    /// Position of this island in per-island arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for IslandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for IslandId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Decode a slot holding an element index (dof, row, or tree).
pub fn slot_index(slot: i32) -> Option<usize> {
    usize::try_from(slot).ok()
}

/// Encode an element index into a slot.
///
/// Model validation caps every count at `i32::MAX`, so indices of a
/// validated model always fit.
pub fn index_slot(index: usize) -> i32 {
    debug_assert!(index <= i32::MAX as usize, "index {index} exceeds slot range");
    index as i32
}
