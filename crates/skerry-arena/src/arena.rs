//! Fixed-capacity output arena with checkpoint rollback.
//!
//! [`OutputArena`] bump-allocates index slots for results that must outlive
//! the call that produced them. It never grows: when a request does not
//! fit, allocation fails with [`ArenaError::CapacityExceeded`] and the
//! caller rolls back to an [`ArenaMark`] taken before it started.

use std::ops::Range;

use crate::error::ArenaError;
use crate::SLOT_BYTES;

/// Checkpoint of the arena's bump pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaMark(usize);

/// Location of one allocation inside the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaSpan {
    offset: usize,
    len: usize,
}

impl ArenaSpan {
    /// Number of slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the span holds no slots.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Bump allocator over a pre-allocated `Vec<i32>`.
///
/// Spans handed out before a [`rollback`](Self::rollback) or
/// [`reset`](Self::reset) past their offset must not be used again.
pub struct OutputArena {
    /// Backing storage. Allocated to full capacity at creation.
    data: Vec<i32>,
    /// Bump pointer: next free slot.
    cursor: usize,
    /// Highest value the cursor has reached.
    high_water: usize,
}

impl OutputArena {
    /// Create an arena holding `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            cursor: 0,
            high_water: 0,
        }
    }

    /// Bump-allocate `len` slots, each set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::CapacityExceeded`] if fewer than `len` slots
    /// remain. The arena is unchanged on failure.
    pub fn alloc_filled(&mut self, len: usize, value: i32) -> Result<ArenaSpan, ArenaError> {
        let new_cursor = match self.cursor.checked_add(len) {
            Some(c) if c <= self.data.len() => c,
            _ => {
                return Err(ArenaError::CapacityExceeded {
                    requested: len.saturating_mul(SLOT_BYTES),
                    capacity: self.remaining() * SLOT_BYTES,
                })
            }
        };
        let span = ArenaSpan {
            offset: self.cursor,
            len,
        };
        self.data[span.range()].fill(value);
        self.cursor = new_cursor;
        self.high_water = self.high_water.max(new_cursor);
        Ok(span)
    }

    /// Bump-allocate `len` zeroed slots.
    ///
    /// # Errors
    ///
    /// See [`alloc_filled`](Self::alloc_filled).
    pub fn alloc(&mut self, len: usize) -> Result<ArenaSpan, ArenaError> {
        self.alloc_filled(len, 0)
    }

    /// Checkpoint the current bump pointer.
    pub fn mark(&self) -> ArenaMark {
        ArenaMark(self.cursor)
    }

    /// Return the bump pointer to `mark`, discarding later allocations.
    pub fn rollback(&mut self, mark: ArenaMark) {
        debug_assert!(
            mark.0 <= self.cursor,
            "rollback to {} past cursor {}",
            mark.0,
            self.cursor
        );
        self.cursor = mark.0.min(self.cursor);
    }

    /// Discard every allocation.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Shared view of a span.
    pub fn slice(&self, span: ArenaSpan) -> &[i32] {
        &self.data[span.range()]
    }

    /// Mutable view of a span.
    pub fn slice_mut(&mut self, span: ArenaSpan) -> &mut [i32] {
        &mut self.data[span.range()]
    }

    /// Mutable views of several spans at once.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::OverlappingSpans`] if two spans overlap or a
    /// span lies outside the arena.
    pub fn disjoint_mut<const N: usize>(
        &mut self,
        spans: [ArenaSpan; N],
    ) -> Result<[&mut [i32]; N], ArenaError> {
        self.data
            .get_disjoint_mut(spans.map(|s| s.range()))
            .map_err(|_| ArenaError::OverlappingSpans)
    }

    /// Slots currently allocated.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total capacity in slots.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Slots still free.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Highest number of slots ever allocated at once.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.len() * SLOT_BYTES
    }
}
