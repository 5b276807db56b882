//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during scratch or arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The output arena cannot satisfy an allocation.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes still free in the arena.
        capacity: usize,
    },
    /// The scratch stack would grow past its configured limit.
    ScratchExhausted {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes still available before the limit.
        capacity: usize,
    },
    /// The same span was requested twice in one `disjoint_mut` call, or a
    /// span does not belong to the region.
    OverlappingSpans,
    /// Configuration values are inconsistent.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, {capacity} bytes free"
                )
            }
            Self::ScratchExhausted {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "scratch stack exhausted: requested {requested} bytes, {capacity} bytes available"
                )
            }
            Self::OverlappingSpans => write!(f, "overlapping or foreign spans"),
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
        }
    }
}

impl Error for ArenaError {}
