//! Skerry: constraint-island decomposition for rigid-body physics solvers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Skerry sub-crates. For most users, adding `skerry` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use skerry::prelude::*;
//!
//! // World body 0, then two single-dof trees with one body and geom each.
//! let model = Model {
//!     nv: 2,
//!     ntree: 2,
//!     body_treeid: vec![None, Some(0), Some(1)],
//!     dof_treeid: vec![0, 1],
//!     jnt_dofadr: vec![0, 1],
//!     geom_bodyid: vec![0, 1, 2],
//!     ..Model::default()
//! };
//!
//! // One frictionless contact between the two trees.
//! let contacts = vec![Contact::new(1, 2)];
//! let jac = DMatrix::from_row_slice(1, 2, &[1.0, -1.0]);
//! let efc = EfcRows::new(
//!     vec![ConstraintType::ContactFrictionless],
//!     vec![0],
//!     Jacobian::Dense(jac),
//! )
//! .unwrap();
//!
//! let mut data = Data::new(&model, &ArenaConfig::default()).unwrap();
//! data.set_constraints(&model, contacts, efc).unwrap();
//! discover_islands(&model, &mut data).unwrap();
//!
//! assert_eq!(data.nisland(), 1);
//! assert_eq!(data.island_dofs(IslandId(0)).collect::<Vec<_>>(), vec![0, 1]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `skerry-core` | Model, constraint rows, Jacobians, ids |
//! | [`arena`] | `skerry-arena` | Scratch stack and output arena |
//! | [`island`] | `skerry-island` | Island discovery, per-step data, warnings |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Model, constraint rows and ids (`skerry-core`).
///
/// Contains the read-only [`types::Model`] description, the per-step
/// [`types::EfcRows`] and both [`types::Jacobian`] layouts.
pub use skerry_core as types;

/// Call-scoped memory (`skerry-arena`).
///
/// [`arena::ScratchStack`] for transient buffers released per call and
/// [`arena::OutputArena`] for the outputs that live until the next step.
pub use skerry_arena as arena;

/// Island discovery (`skerry-island`).
///
/// [`island::discover_islands`] is the entry point. The building blocks
/// ([`island::build_adjacency`], [`island::flood_fill`]) are exposed for
/// callers with their own graphs.
pub use skerry_island as island;

/// Common imports for typical Skerry usage.
///
/// ```rust
/// use skerry::prelude::*;
/// ```
pub mod prelude {
    // Model and rows
    pub use skerry_core::{
        ConstraintType, Contact, EfcRows, EqualityType, IslandId, Jacobian, Model,
        SparseJacobian, DISABLE_ISLAND,
    };

    // Memory
    pub use skerry_arena::ArenaConfig;

    // Discovery
    pub use skerry_island::{discover_islands, Data, IslandArrays, Warning};

    // Errors
    pub use skerry_arena::ArenaError;
    pub use skerry_core::ModelError;
    pub use skerry_island::IslandError;
}
