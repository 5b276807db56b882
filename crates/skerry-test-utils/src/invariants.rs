//! Structural checks on a finished island index.

use skerry_core::{IslandId, Model};
use skerry_island::Data;

use crate::reference::{reference_components, row_couplings, same_partition};

/// Walk one island list from `head`, failing on cycles or descending
/// steps.
fn walk(
    what: &str,
    island: IslandId,
    head: Option<usize>,
    next: impl Fn(usize) -> Option<usize>,
    limit: usize,
) -> Result<Vec<usize>, String> {
    let mut visited = Vec::new();
    let mut cursor = head;
    while let Some(i) = cursor {
        if visited.len() >= limit {
            return Err(format!("{what} list of island {island} does not terminate"));
        }
        if visited.last().is_some_and(|&prev| prev >= i) {
            return Err(format!("{what} list of island {island} not ascending at {i}"));
        }
        visited.push(i);
        cursor = next(i);
    }
    Ok(visited)
}

/// Check every structural property of the index in `data` against the
/// rows it was built from. A cleared index fails the partition check
/// unless there were no rows.
///
/// * trees, dofs and rows carry island ids below `nisland`
/// * the tree partition equals the Jacobian's connected components
/// * every dof has its tree's island
/// * every tree a row touches is in the row's island
/// * each island list visits exactly its members, ascending, once
/// * per-island counts match the lists
pub fn check_island_invariants(model: &Model, data: &Data) -> Result<(), String> {
    let nisland = data.nisland();
    let efc = data.efc();
    let nefc = efc.nefc();

    let trees: Vec<Option<usize>> = (0..model.ntree)
        .map(|t| data.tree_island(t).map(IslandId::index))
        .collect();
    if let Some(bad) = trees.iter().flatten().find(|&&i| i >= nisland) {
        return Err(format!("island id {bad} out of range 0..{nisland}"));
    }
    let expected = reference_components(model.ntree, &row_couplings(model, efc));
    if !same_partition(&trees, &expected) {
        return Err(format!("tree partition {trees:?}, expected {expected:?}"));
    }
    let ncomponent = expected.iter().flatten().max().map_or(0, |m| m + 1);
    if nisland != ncomponent {
        return Err(format!("nisland {nisland}, expected {ncomponent}"));
    }

    for dof in 0..model.nv {
        let tree = model.dof_treeid[dof];
        if data.dof_island(dof).map(IslandId::index) != trees[tree] {
            return Err(format!("dof {dof} island differs from tree {tree}"));
        }
    }

    for row in 0..nefc {
        let island = data.efc_island(row);
        if island.is_none() {
            return Err(format!("row {row} has no island"));
        }
        for dof in efc.jacobian().row_dofs(row) {
            let tree = model.dof_treeid[dof];
            if data.tree_island(tree) != island {
                return Err(format!("row {row} touches tree {tree} outside its island"));
            }
        }
    }

    for island in data.islands() {
        let dofs = walk(
            "dof",
            island,
            data.island_dofadr(island),
            |d| data.dof_islandnext(d),
            model.nv,
        )?;
        let members: Vec<usize> = (0..model.nv)
            .filter(|&d| data.dof_island(d) == Some(island))
            .collect();
        if dofs != members || dofs.len() != data.island_nv(island) {
            return Err(format!("dof list of island {island} is {dofs:?}, members {members:?}"));
        }

        let rows = walk(
            "row",
            island,
            data.island_efcadr(island),
            |r| data.efc_islandnext(r),
            nefc,
        )?;
        let members: Vec<usize> = (0..nefc)
            .filter(|&r| data.efc_island(r) == Some(island))
            .collect();
        if rows != members || rows.len() != data.island_nefc(island) {
            return Err(format!("row list of island {island} is {rows:?}, members {members:?}"));
        }

        let ntree = trees.iter().filter(|&&t| t == Some(island.index())).count();
        if ntree != data.island_ntree(island) {
            return Err(format!("island {island} has {ntree} trees"));
        }
    }
    Ok(())
}

/// Panic with a description of the first violated property.
pub fn assert_island_invariants(model: &Model, data: &Data) {
    if let Err(msg) = check_island_invariants(model, data) {
        panic!("island invariant violated: {msg}");
    }
}
