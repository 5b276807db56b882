//! LIFO scratch stack for transient per-call buffers.
//!
//! [`ScratchStack`] is a bump allocator over a `Vec<i32>` that is released
//! in reverse order of acquisition. Callers open a [`ScratchFrame`], which
//! records the current mark and releases back to it when dropped, so every
//! exit path (early return, `?`, or unwinding) frees the frame's buffers.
//! The backing allocation is reused across calls.

use std::ops::{Deref, DerefMut, Range};

use crate::error::ArenaError;
use crate::SLOT_BYTES;

/// Position of the stack pointer at some moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScratchMark(usize);

/// Location of one scratch buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScratchSpan {
    offset: usize,
    len: usize,
}

impl ScratchSpan {
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

/// Growable LIFO stack of index slots.
///
/// Grows on demand, never past `max_slots`. Growth never moves a
/// [`ScratchSpan`]: spans are offsets, not pointers.
pub struct ScratchStack {
    /// Backing storage. Grows on demand, never shrinks during runtime.
    data: Vec<i32>,
    /// Current stack pointer (slots in use).
    cursor: usize,
    /// Hard growth limit in slots.
    max_slots: usize,
    /// Highest value the cursor has reached.
    high_water: usize,
}

impl ScratchStack {
    /// Create a stack with `initial` slots that may grow to `max_slots`.
    pub fn new(initial: usize, max_slots: usize) -> Self {
        Self {
            data: vec![0; initial.min(max_slots)],
            cursor: 0,
            max_slots,
            high_water: 0,
        }
    }

    /// Push a buffer of `len` slots, each set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ScratchExhausted`] if the stack would exceed
    /// its growth limit. The stack is unchanged on failure.
    pub fn alloc_filled(&mut self, len: usize, value: i32) -> Result<ScratchSpan, ArenaError> {
        let new_cursor = match self.cursor.checked_add(len) {
            Some(c) if c <= self.max_slots => c,
            _ => {
                return Err(ArenaError::ScratchExhausted {
                    requested: len.saturating_mul(SLOT_BYTES),
                    capacity: (self.max_slots - self.cursor) * SLOT_BYTES,
                })
            }
        };
        if new_cursor > self.data.len() {
            // Grow to double the requirement, clamped to the limit.
            let new_cap = self
                .data
                .len()
                .max(1024)
                .max(new_cursor)
                .saturating_mul(2)
                .min(self.max_slots);
            self.data.resize(new_cap, 0);
        }
        let span = ScratchSpan {
            offset: self.cursor,
            len,
        };
        self.data[span.range()].fill(value);
        self.cursor = new_cursor;
        self.high_water = self.high_water.max(new_cursor);
        Ok(span)
    }

    /// Push a zeroed buffer of `len` slots.
    ///
    /// # Errors
    ///
    /// See [`alloc_filled`](Self::alloc_filled).
    pub fn alloc(&mut self, len: usize) -> Result<ScratchSpan, ArenaError> {
        self.alloc_filled(len, 0)
    }

    /// Current stack pointer.
    pub fn mark(&self) -> ScratchMark {
        ScratchMark(self.cursor)
    }

    /// Pop every buffer pushed after `mark`.
    pub fn release(&mut self, mark: ScratchMark) {
        debug_assert!(
            mark.0 <= self.cursor,
            "release to {} past cursor {}",
            mark.0,
            self.cursor
        );
        self.cursor = mark.0.min(self.cursor);
    }

    /// Pop everything.
    pub fn release_all(&mut self) {
        self.cursor = 0;
    }

    /// Open a frame that releases back to the current mark when dropped.
    pub fn frame(&mut self) -> ScratchFrame<'_> {
        let mark = self.mark();
        ScratchFrame { stack: self, mark }
    }

    /// Shared view of a buffer.
    pub fn slice(&self, span: ScratchSpan) -> &[i32] {
        &self.data[span.range()]
    }

    /// Mutable view of a buffer.
    pub fn slice_mut(&mut self, span: ScratchSpan) -> &mut [i32] {
        &mut self.data[span.range()]
    }

    /// Mutable views of several buffers at once.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::OverlappingSpans`] if two spans overlap or a
    /// span lies outside the stack.
    pub fn disjoint_mut<const N: usize>(
        &mut self,
        spans: [ScratchSpan; N],
    ) -> Result<[&mut [i32]; N], ArenaError> {
        self.data
            .get_disjoint_mut(spans.map(|s| s.range()))
            .map_err(|_| ArenaError::OverlappingSpans)
    }

    /// Slots currently in use.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Slots currently backed by storage.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Hard growth limit in slots.
    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    /// Highest number of slots ever in use at once.
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

/// Scope guard over a [`ScratchStack`].
///
/// Dereferences to the stack. On drop, everything pushed through the
/// frame (or any nested frame) is released.
#[must_use]
pub struct ScratchFrame<'a> {
    stack: &'a mut ScratchStack,
    mark: ScratchMark,
}

impl ScratchFrame<'_> {
    /// The mark this frame releases to.
    pub fn mark(&self) -> ScratchMark {
        self.mark
    }
}

impl Deref for ScratchFrame<'_> {
    type Target = ScratchStack;

    fn deref(&self) -> &ScratchStack {
        self.stack
    }
}

impl DerefMut for ScratchFrame<'_> {
    fn deref_mut(&mut self) -> &mut ScratchStack {
        self.stack
    }
}

impl Drop for ScratchFrame<'_> {
    fn drop(&mut self) {
        self.stack.release(self.mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_filled_slice() {
        let mut stack = ScratchStack::new(64, 1024);
        let s = stack.alloc_filled(10, -1).unwrap();
        assert_eq!(s.len(), 10);
        assert!(stack.slice(s).iter().all(|&v| v == -1));
    }

    #[test]
    fn sequential_allocs_dont_overlap() {
        let mut stack = ScratchStack::new(64, 1024);
        let a = stack.alloc(5).unwrap();
        let b = stack.alloc(3).unwrap();
        {
            let [sa, sb] = stack.disjoint_mut([a, b]).unwrap();
            sa.fill(1);
            sb.fill(2);
        }
        assert_eq!(stack.slice(a), &[1; 5]);
        assert_eq!(stack.slice(b), &[2; 3]);
        assert_eq!(stack.used(), 8);
    }

    #[test]
    fn frame_releases_on_drop() {
        let mut stack = ScratchStack::new(64, 1024);
        stack.alloc(4).unwrap();
        {
            let mut frame = stack.frame();
            frame.alloc(20).unwrap();
            assert_eq!(frame.used(), 24);
        }
        assert_eq!(stack.used(), 4);
        assert_eq!(stack.high_water(), 24);
    }

    #[test]
    fn frame_releases_on_early_return() {
        fn fails(stack: &mut ScratchStack) -> Result<(), ArenaError> {
            let mut frame = stack.frame();
            frame.alloc(8)?;
            frame.alloc(usize::MAX)?;
            Ok(())
        }
        let mut stack = ScratchStack::new(16, 1024);
        assert!(matches!(
            fails(&mut stack),
            Err(ArenaError::ScratchExhausted { .. })
        ));
        assert_eq!(stack.used(), 0);
    }

    #[test]
    fn nested_frames_release_lifo() {
        let mut stack = ScratchStack::new(0, 1024);
        let mut outer = stack.frame();
        outer.alloc(3).unwrap();
        {
            let mut inner = outer.frame();
            inner.alloc(7).unwrap();
            assert_eq!(inner.used(), 10);
        }
        assert_eq!(outer.used(), 3);
        drop(outer);
        assert_eq!(stack.used(), 0);
    }

    #[test]
    fn grows_beyond_initial_capacity() {
        let mut stack = ScratchStack::new(10, 1 << 20);
        let s = stack.alloc(100).unwrap();
        assert_eq!(s.len(), 100);
        assert!(stack.capacity() >= 100);
    }

    #[test]
    fn growth_is_clamped_to_limit() {
        let mut stack = ScratchStack::new(0, 1500);
        stack.alloc(1200).unwrap();
        assert_eq!(stack.capacity(), 1500);
        assert!(stack.alloc(301).is_err());
        assert!(stack.alloc(300).is_ok());
    }

    #[test]
    fn exhaustion_reports_bytes() {
        let mut stack = ScratchStack::new(0, 4);
        stack.alloc(1).unwrap();
        assert_eq!(
            stack.alloc(5).unwrap_err(),
            ArenaError::ScratchExhausted {
                requested: 20,
                capacity: 12,
            }
        );
        assert_eq!(stack.used(), 1);
    }

    #[test]
    fn zero_alloc_is_valid() {
        let mut stack = ScratchStack::new(0, 0);
        let s = stack.alloc(0).unwrap();
        assert!(s.is_empty());
        assert_eq!(stack.used(), 0);
    }

    #[test]
    fn release_all_empties_stack() {
        let mut stack = ScratchStack::new(16, 64);
        stack.alloc(9).unwrap();
        stack.release_all();
        assert_eq!(stack.used(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn nested_frames_restore_every_level(
                sizes in proptest::collection::vec(0usize..200, 1..12),
            ) {
                fn push_all(stack: &mut ScratchStack, sizes: &[usize]) -> usize {
                    let Some((&first, rest)) = sizes.split_first() else {
                        return stack.used();
                    };
                    let before = stack.used();
                    let mut frame = stack.frame();
                    frame.alloc(first).unwrap();
                    let peak = push_all(&mut frame, rest);
                    assert_eq!(frame.used(), before + first);
                    peak
                }
                let mut stack = ScratchStack::new(0, 1 << 16);
                let peak = push_all(&mut stack, &sizes);
                prop_assert_eq!(stack.used(), 0);
                prop_assert_eq!(peak, sizes.iter().sum::<usize>());
                prop_assert_eq!(stack.high_water(), peak);
            }
        }
    }
}
