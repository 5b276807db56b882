//! Jacobian row scans shared by edge extraction and row projection.

use skerry_core::{Jacobian, Model};
use smallvec::SmallVec;

/// Trees touched by one row, in column order.
pub(crate) type RowTrees = SmallVec<[usize; 4]>;

/// Trees touched by `row`, in scan order, with consecutive repeats
/// collapsed.
///
/// With contiguous tree dofs and ascending columns every tree appears
/// once. An unsorted sparse row may list a tree again after another one.
pub(crate) fn row_trees(model: &Model, jacobian: &Jacobian, row: usize) -> RowTrees {
    let mut trees = RowTrees::new();
    for dof in jacobian.row_dofs(row) {
        let tree = model.dof_treeid[dof];
        if trees.last() != Some(&tree) {
            trees.push(tree);
        }
    }
    trees
}

/// First tree touched by `row`, `None` for an empty row.
pub(crate) fn first_tree(model: &Model, jacobian: &Jacobian, row: usize) -> Option<usize> {
    jacobian
        .row_dofs(row)
        .next()
        .map(|dof| model.dof_treeid[dof])
}
