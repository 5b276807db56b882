//! Fatal consistency violations raised by island discovery.
//!
//! None of these are expected at runtime. Each one means the inputs broke
//! an invariant (a constraint row touching no tree) or the decomposition
//! itself is wrong (an island with no dofs). The call is aborted and its
//! outputs cleared rather than handing corrupted indices to the solver.
//! Arena exhaustion is deliberately absent: it is a recoverable warning.

use std::error::Error;
use std::fmt;

use skerry_arena::ArenaError;

/// Errors that abort a [`discover_islands`](crate::discover_islands) call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IslandError {
    /// A constraint couples the world to itself: neither endpoint is an
    /// articulated tree.
    StaticSelfEdge {
        /// Constraint row that produced the edge.
        row: usize,
    },
    /// More edges were extracted than the precomputed upper bound allows.
    EdgeCapacityExceeded {
        /// The bound, in edge slots.
        capacity: usize,
    },
    /// A constraint row has no populated Jacobian column.
    EmptyConstraintRow {
        /// The row.
        row: usize,
    },
    /// A constraint row maps to a tree that was not placed in any island.
    UnassignedConstraintRow {
        /// The row.
        row: usize,
        /// The first tree the row touches.
        tree: usize,
    },
    /// After linking, the number of islands that received at least one
    /// element differs from the number of islands found.
    IslandCountMismatch {
        /// `"dofs"` or `"constraints"`.
        elements: &'static str,
        /// Islands that received at least one element.
        found: usize,
        /// Islands produced by flood fill.
        expected: usize,
    },
    /// The scratch stack could not provide a transient buffer.
    Scratch(ArenaError),
}

impl fmt::Display for IslandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticSelfEdge { row } => {
                write!(f, "self-edge of the static tree (constraint row {row})")
            }
            Self::EdgeCapacityExceeded { capacity } => {
                write!(f, "edge array too small (capacity {capacity})")
            }
            Self::EmptyConstraintRow { row } => {
                write!(f, "constraint {row} touches no tree")
            }
            Self::UnassignedConstraintRow { row, tree } => {
                write!(f, "constraint {row} not in any island (tree {tree})")
            }
            Self::IslandCountMismatch {
                elements,
                found,
                expected,
            } => {
                write!(
                    f,
                    "not all islands assigned to {elements}: {found} of {expected}"
                )
            }
            Self::Scratch(err) => write!(f, "scratch allocation failed: {err}"),
        }
    }
}

impl Error for IslandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Scratch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArenaError> for IslandError {
    fn from(err: ArenaError) -> Self {
        Self::Scratch(err)
    }
}
