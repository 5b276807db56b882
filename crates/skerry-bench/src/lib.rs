//! Benchmark profiles for Skerry island discovery.
//!
//! - [`chain_profile`]: trees linked end to end by contacts, one island
//! - [`pairs_profile`]: trees contacting in disjoint pairs, many islands
//! - [`scattered_profile`]: a seeded mix of every constraint kind
//! - [`chain_graph`]: a bare CSR chain for the flood fill alone

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use skerry_test_utils::{random_scenario, ModelBuilder, RowsBuilder, Scenario, ScenarioParams};

/// `ntree` single-dof trees where tree `i` contacts tree `i + 1`.
///
/// Every contact is pyramidal with four rows, so rows outnumber edges.
pub fn chain_profile(ntree: usize) -> Scenario {
    let mut b = ModelBuilder::new();
    let trees = b.trees(ntree, 1);
    let model = b.build();
    let mut rows = RowsBuilder::new(&model);
    for pair in trees.windows(2) {
        rows.contact(
            pair[0].geom,
            pair[1].geom,
            skerry_core::ConstraintType::ContactPyramidal,
            4,
        );
    }
    let (contacts, efc) = rows.build_sparse();
    Scenario {
        model,
        contacts,
        efc,
    }
}

/// `2 * npair` two-dof trees contacting in disjoint pairs.
pub fn pairs_profile(npair: usize) -> Scenario {
    let mut b = ModelBuilder::new();
    let trees = b.trees(2 * npair, 2);
    let model = b.build();
    let mut rows = RowsBuilder::new(&model);
    for pair in trees.chunks_exact(2) {
        rows.frictionless(pair[0].geom, pair[1].geom);
    }
    let (contacts, efc) = rows.build_sparse();
    Scenario {
        model,
        contacts,
        efc,
    }
}

/// A seeded random scenario over `ntree` trees with a sparse Jacobian.
pub fn scattered_profile(seed: u64, ntree: usize) -> Scenario {
    let params = ScenarioParams {
        ntree,
        max_contacts: ntree,
        max_equalities: ntree / 8,
        max_joint_friction: ntree / 4,
        max_joint_limits: ntree / 4,
        max_tendons: ntree / 16,
        ..ScenarioParams::default()
    };
    let mut s = random_scenario(seed, &params);
    s.efc = s.sparse_efc();
    s
}

/// CSR arrays of a path graph on `n` vertices with a self-edge on each.
///
/// Returns `(rownnz, rowadr, colind)`.
pub fn chain_graph(n: usize) -> (Vec<i32>, Vec<i32>, Vec<i32>) {
    let mut rownnz = Vec::with_capacity(n);
    let mut rowadr = Vec::with_capacity(n);
    let mut colind = Vec::new();
    for v in 0..n {
        rowadr.push(colind.len() as i32);
        if v > 0 {
            colind.push(v as i32 - 1);
        }
        colind.push(v as i32);
        if v + 1 < n {
            colind.push(v as i32 + 1);
        }
        rownnz.push(colind.len() as i32 - rowadr[v]);
    }
    (rownnz, rowadr, colind)
}
