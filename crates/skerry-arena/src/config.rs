//! Arena configuration parameters.

use crate::error::ArenaError;
use crate::SLOT_BYTES;

/// Sizing of the scratch stack and output arena.
///
/// Validated when a `Data` is created; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Capacity of the output arena in index slots. Fixed for the
    /// lifetime of the arena.
    ///
    /// Default: 1_048_576 (4MB).
    pub arena_slots: usize,

    /// Initial scratch stack size in index slots.
    ///
    /// Default: 65_536.
    pub scratch_slots: usize,

    /// Hard limit the scratch stack may grow to.
    ///
    /// Default: 67_108_864 (256MB). Must be at least `scratch_slots`.
    pub max_scratch_slots: usize,
}

impl ArenaConfig {
    /// Default output arena capacity.
    pub const DEFAULT_ARENA_SLOTS: usize = 1 << 20;

    /// Default initial scratch size.
    pub const DEFAULT_SCRATCH_SLOTS: usize = 1 << 16;

    /// Default scratch growth limit.
    pub const DEFAULT_MAX_SCRATCH_SLOTS: usize = 1 << 26;

    /// Create a config with the given arena capacity and default scratch
    /// sizing.
    pub fn new(arena_slots: usize) -> Self {
        Self {
            arena_slots,
            scratch_slots: Self::DEFAULT_SCRATCH_SLOTS,
            max_scratch_slots: Self::DEFAULT_MAX_SCRATCH_SLOTS,
        }
    }

    /// Output arena capacity in bytes.
    pub fn arena_bytes(&self) -> usize {
        self.arena_slots * SLOT_BYTES
    }

    /// Check that the scratch limits are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`] if `scratch_slots` exceeds
    /// `max_scratch_slots`.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.scratch_slots > self.max_scratch_slots {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "scratch_slots ({}) exceeds max_scratch_slots ({})",
                    self.scratch_slots, self.max_scratch_slots
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ARENA_SLOTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_arena_is_4mb() {
        assert_eq!(ArenaConfig::default().arena_bytes(), 4 * 1024 * 1024);
    }

    #[test]
    fn zero_arena_is_valid() {
        let config = ArenaConfig::new(0);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.arena_bytes(), 0);
    }

    #[test]
    fn scratch_above_limit_rejected() {
        let config = ArenaConfig {
            scratch_slots: 10,
            max_scratch_slots: 5,
            ..ArenaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ArenaError::InvalidConfig { .. })
        ));
    }
}
