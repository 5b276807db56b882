//! Constraint-island discovery over a forest of kinematic trees.
//!
//! Trees coupled through at least one active constraint row are grouped
//! into islands, the connected components of the tree adjacency graph.
//! Dofs and constraint rows are then indexed by island so a solver can
//! treat each island as an independent subsystem.
//!
//! The entry point is [`discover_islands`]. Inputs and outputs live in
//! [`Data`]; transient buffers come from its scratch stack and the index
//! itself from its output arena.
//!
//! The graph primitives ([`build_adjacency`], [`flood_fill`]) are exported
//! for use on any sparse symmetric adjacency.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod data;
pub mod error;
pub mod island;
pub mod warning;

pub use data::{Data, IslandArrays, IslandIter};
pub use error::IslandError;
pub use island::{build_adjacency, discover_islands, edge_bound, flood_fill, CsrGraph};
pub use warning::{Warning, WarningStat, NUM_WARNINGS};
