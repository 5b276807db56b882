//! Test fixtures and reference checks for Skerry development.
//!
//! - [`ModelBuilder`] / [`RowsBuilder`]: hand-built trees and constraint
//!   rows with Jacobians that touch exactly the coupled trees.
//! - [`random_scenario`]: seeded mixes of every constraint kind.
//! - [`reference_components`] / [`same_partition`]: union-find oracle.
//! - [`check_island_invariants`]: structural checks on a finished index.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod builder;
pub mod invariants;
pub mod reference;
pub mod scenario;

pub use builder::{ModelBuilder, RowsBuilder, TreeHandle, WORLD_BODY, WORLD_GEOM};
pub use invariants::{assert_island_invariants, check_island_invariants};
pub use reference::{
    partition, reference_components, row_couplings, same_partition, UnionFind,
};
pub use scenario::{random_scenario, Scenario, ScenarioParams};
