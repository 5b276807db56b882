//! Projection of tree islands onto dofs and constraint rows.
//!
//! Each element inherits an island and is appended to that island's
//! intrusive list. One forward pass links elements through a per-island
//! tail pointer; a second pass terminates every tail. Lists therefore
//! come out in ascending element order.

use skerry_core::{index_slot, slot_index, Jacobian, Model, NONE};

use super::scan::first_tree;
use crate::error::IslandError;

/// Output arrays of one element kind.
pub(crate) struct IslandLists<'a> {
    /// First element of each island.
    pub(crate) head: &'a mut [i32],
    /// Island of each element.
    pub(crate) island: &'a mut [i32],
    /// Next element in the same island.
    pub(crate) next: &'a mut [i32],
    /// Elements per island.
    pub(crate) count: &'a mut [i32],
}

/// Assign and link `n` elements. `last` holds one tail slot per island.
fn link(
    elements: &'static str,
    n: usize,
    lists: IslandLists<'_>,
    last: &mut [i32],
    mut island_of: impl FnMut(usize) -> Result<i32, IslandError>,
) -> Result<(), IslandError> {
    let nisland = last.len();
    last.fill(NONE);
    lists.count.fill(0);

    let mut found = 0;
    for i in 0..n {
        let island = island_of(i)?;
        lists.island[i] = island;
        let Some(k) = slot_index(island) else {
            lists.next[i] = NONE;
            continue;
        };
        match slot_index(last[k]) {
            None => {
                lists.head[k] = index_slot(i);
                found += 1;
            }
            Some(prev) => lists.next[prev] = index_slot(i),
        }
        last[k] = index_slot(i);
        lists.count[k] += 1;
    }

    if found != nisland {
        return Err(IslandError::IslandCountMismatch {
            elements,
            found,
            expected: nisland,
        });
    }

    for &tail in last.iter() {
        if let Some(tail) = slot_index(tail) {
            lists.next[tail] = NONE;
        }
    }
    Ok(())
}

/// Give every dof its tree's island.
pub(crate) fn link_dofs(
    model: &Model,
    tree_island: &[i32],
    lists: IslandLists<'_>,
    last: &mut [i32],
) -> Result<(), IslandError> {
    link("dofs", model.nv, lists, last, |dof| {
        Ok(tree_island[model.dof_treeid[dof]])
    })
}

/// Give every constraint row the island of the first tree it touches.
///
/// Every row must touch a tree, and that tree must be in an island.
pub(crate) fn link_rows(
    model: &Model,
    jacobian: &Jacobian,
    tree_island: &[i32],
    lists: IslandLists<'_>,
    last: &mut [i32],
) -> Result<(), IslandError> {
    link("constraints", jacobian.nrows(), lists, last, |row| {
        let tree = first_tree(model, jacobian, row)
            .ok_or(IslandError::EmptyConstraintRow { row })?;
        match tree_island[tree] {
            NONE => Err(IslandError::UnassignedConstraintRow { row, tree }),
            island => Ok(island),
        }
    })
}
