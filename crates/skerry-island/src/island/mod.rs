//! Island discovery.
//!
//! ```text
//! EfcRows ──► extract_edges ──► build_adjacency ──► flood_fill ──► link_dofs / link_rows
//!              (scratch)          (scratch)          (scratch)        (arena outputs)
//! ```
//!
//! Every transient buffer comes from one [`ScratchFrame`] and is released
//! when the call returns, on every path. Outputs are allocated from the
//! [`OutputArena`] after a mark; if they do not fit, the arena is rolled
//! back to the mark, the index is cleared and [`Warning::ArenaFull`] is
//! recorded.
//!
//! [`ScratchFrame`]: skerry_arena::ScratchFrame

mod adjacency;
mod edge;
mod flood;
mod project;
mod scan;

pub use adjacency::build_adjacency;
pub use edge::edge_bound;
pub use flood::{flood_fill, CsrGraph};

use skerry_arena::{ArenaError, OutputArena, ScratchStack};
use skerry_core::{Contact, EfcRows, Model, DISABLE_ISLAND, NONE};

use crate::data::{Data, IslandSpans};
use crate::error::IslandError;
use crate::warning::{record, Warning};
use edge::{extract_edges, EdgeSink};
use project::{link_dofs, link_rows, IslandLists};

/// Result of a call that did not hit a fatal violation.
enum Outcome {
    Built {
        spans: IslandSpans,
        nedge: usize,
        nisland: usize,
    },
    ArenaFull {
        requested: usize,
    },
}

/// Partition the trees of `model` into islands coupled by the active
/// constraints in `data`, and index dofs and rows by island.
///
/// With no active rows, or with [`DISABLE_ISLAND`] set, the index is
/// cleared and `nisland` is zero. If the output arena is too small the
/// index is likewise cleared, the installed contacts and rows are dropped
/// (`nefc` becomes zero) and [`Warning::ArenaFull`] is recorded; this is
/// not an error.
///
/// # Errors
///
/// Returns an [`IslandError`] if the inputs violate a structural
/// invariant. The index is cleared and the arena rolled back before
/// returning.
pub fn discover_islands(model: &Model, data: &mut Data) -> Result<(), IslandError> {
    let Data {
        contacts,
        efc,
        scratch,
        arena,
        islands,
        warnings,
    } = data;

    islands.clear();
    if efc.nefc() == 0 || model.is_disabled(DISABLE_ISLAND) {
        return Ok(());
    }

    let mark = arena.mark();
    match build(model, contacts, efc, scratch, arena) {
        Ok(Outcome::Built {
            spans,
            nedge,
            nisland,
        }) => {
            islands.nisland = nisland;
            islands.spans = Some(spans);
            tracing::trace!(nefc = efc.nefc(), nedge, nisland, "islands discovered");
            Ok(())
        }
        Ok(Outcome::ArenaFull { requested }) => {
            arena.rollback(mark);
            // Rows without an island index must not reach the solver.
            *efc = EfcRows::empty(model.nv);
            contacts.clear();
            record(warnings, Warning::ArenaFull, requested);
            Ok(())
        }
        Err(err) => {
            arena.rollback(mark);
            tracing::error!(error = %err, "island discovery aborted");
            Err(err)
        }
    }
}

fn build(
    model: &Model,
    contacts: &[Contact],
    efc: &EfcRows,
    scratch: &mut ScratchStack,
    arena: &mut OutputArena,
) -> Result<Outcome, IslandError> {
    let (nv, ntree, nefc) = (model.nv, model.ntree, efc.nefc());
    let mut frame = scratch.frame();

    // ── Edges ──────────────────────────────────────────────────

    let nedge_max = edge_bound(model, contacts.len(), efc);
    let edge = frame.alloc(2 * nedge_max)?;
    let rownnz = frame.alloc(ntree)?;
    let nedge = {
        let [edge, rownnz] = frame.disjoint_mut([edge, rownnz])?;
        let mut sink = EdgeSink::new(edge, rownnz);
        extract_edges(model, contacts, efc, &mut sink)?;
        sink.len()
    };

    // ── Adjacency and flood fill ───────────────────────────────

    let rowadr = frame.alloc(ntree)?;
    let colind = frame.alloc(nedge)?;
    let tree_island = frame.alloc(ntree)?;
    let stack = frame.alloc(nedge)?;
    let nisland = {
        let [edge, rownnz, rowadr, colind, tree_island, stack] =
            frame.disjoint_mut([edge, rownnz, rowadr, colind, tree_island, stack])?;
        build_adjacency(&edge[..2 * nedge], rownnz, rowadr, colind);
        flood_fill(&CsrGraph::new(rownnz, rowadr, colind), tree_island, stack)
    };

    // ── Outputs ────────────────────────────────────────────────

    let spans = match IslandSpans::allocate(arena, nv, nefc, ntree, nisland) {
        Ok(spans) => spans,
        Err(ArenaError::CapacityExceeded { requested, .. }) => {
            return Ok(Outcome::ArenaFull { requested });
        }
        Err(err) => return Err(err.into()),
    };

    let island_last = frame.alloc_filled(nisland, NONE)?;
    let [tree_island, island_last] = frame.disjoint_mut([tree_island, island_last])?;
    let [
        island_dofadr,
        dof_island,
        dof_islandnext,
        island_efcadr,
        efc_island,
        efc_islandnext,
        out_tree_island,
        island_ntree,
        island_nv,
        island_nefc,
    ] = arena.disjoint_mut([
        spans.island_dofadr,
        spans.dof_island,
        spans.dof_islandnext,
        spans.island_efcadr,
        spans.efc_island,
        spans.efc_islandnext,
        spans.tree_island,
        spans.island_ntree,
        spans.island_nv,
        spans.island_nefc,
    ])?;

    link_dofs(
        model,
        tree_island,
        IslandLists {
            head: island_dofadr,
            island: dof_island,
            next: dof_islandnext,
            count: island_nv,
        },
        island_last,
    )?;
    link_rows(
        model,
        efc.jacobian(),
        tree_island,
        IslandLists {
            head: island_efcadr,
            island: efc_island,
            next: efc_islandnext,
            count: island_nefc,
        },
        island_last,
    )?;

    out_tree_island.copy_from_slice(tree_island);
    for &island in tree_island.iter() {
        if island != NONE {
            island_ntree[island as usize] += 1;
        }
    }

    Ok(Outcome::Built {
        spans,
        nedge,
        nisland,
    })
}
