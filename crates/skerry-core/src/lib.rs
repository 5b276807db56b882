//! Core types for the Skerry constraint-island decomposition.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! read-only inputs of a decomposition call: the kinematic-tree [`Model`],
//! the active constraint rows ([`EfcRows`]) with their dense-or-sparse
//! [`Jacobian`], raw index slots and [`IslandId`], and model validation
//! errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constraint;
pub mod error;
pub mod id;
pub mod jacobian;
pub mod model;

pub use constraint::{ConstraintType, Contact, EfcRows};
pub use error::ModelError;
pub use id::{index_slot, slot_index, IslandId, NONE};
pub use jacobian::{Jacobian, RowDofs, SparseJacobian};
pub use model::{EqualityType, Model, ModelOptions, DISABLE_ISLAND};
