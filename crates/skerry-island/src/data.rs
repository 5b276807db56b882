//! Per-step mutable state: constraint inputs, memory regions, and the
//! island index handed to the solver.
//!
//! The island index lives in the [`OutputArena`]. [`Data`] only records
//! where each output array was allocated; every read goes through the
//! arena, so clearing the index is a matter of forgetting the spans.

use skerry_arena::{ArenaConfig, ArenaError, ArenaSpan, OutputArena, ScratchStack};
use skerry_core::{slot_index, Contact, EfcRows, IslandId, Model, ModelError, NONE};

use crate::warning::{Warning, WarningStat, NUM_WARNINGS};

/// Arena locations of every island output array.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IslandSpans {
    pub(crate) island_dofadr: ArenaSpan,
    pub(crate) dof_island: ArenaSpan,
    pub(crate) dof_islandnext: ArenaSpan,
    pub(crate) island_efcadr: ArenaSpan,
    pub(crate) efc_island: ArenaSpan,
    pub(crate) efc_islandnext: ArenaSpan,
    pub(crate) tree_island: ArenaSpan,
    pub(crate) island_ntree: ArenaSpan,
    pub(crate) island_nv: ArenaSpan,
    pub(crate) island_nefc: ArenaSpan,
}

impl IslandSpans {
    /// Allocate all output arrays, index slots set to [`NONE`] and counts
    /// to zero. Stops at the first request that does not fit.
    pub(crate) fn allocate(
        arena: &mut OutputArena,
        nv: usize,
        nefc: usize,
        ntree: usize,
        nisland: usize,
    ) -> Result<Self, ArenaError> {
        Ok(Self {
            island_dofadr: arena.alloc_filled(nisland, NONE)?,
            dof_island: arena.alloc_filled(nv, NONE)?,
            dof_islandnext: arena.alloc_filled(nv, NONE)?,
            island_efcadr: arena.alloc_filled(nisland, NONE)?,
            efc_island: arena.alloc_filled(nefc, NONE)?,
            efc_islandnext: arena.alloc_filled(nefc, NONE)?,
            tree_island: arena.alloc_filled(ntree, NONE)?,
            island_ntree: arena.alloc(nisland)?,
            island_nv: arena.alloc(nisland)?,
            island_nefc: arena.alloc(nisland)?,
        })
    }
}

/// Island count plus the arrays, if any were produced.
#[derive(Clone, Debug, Default)]
pub(crate) struct IslandIndex {
    pub(crate) nisland: usize,
    pub(crate) spans: Option<IslandSpans>,
}

impl IslandIndex {
    pub(crate) fn clear(&mut self) {
        self.nisland = 0;
        self.spans = None;
    }
}

/// Raw island arrays, as consumed by a solver.
///
/// Index slots hold [`NONE`] for "no island" and "end of list".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IslandArrays<'a> {
    /// First dof of each island.
    pub island_dofadr: &'a [i32],
    /// Island of each dof.
    pub dof_island: &'a [i32],
    /// Next dof in the same island.
    pub dof_islandnext: &'a [i32],
    /// First constraint row of each island.
    pub island_efcadr: &'a [i32],
    /// Island of each constraint row.
    pub efc_island: &'a [i32],
    /// Next constraint row in the same island.
    pub efc_islandnext: &'a [i32],
    /// Island of each tree.
    pub tree_island: &'a [i32],
    /// Trees per island.
    pub island_ntree: &'a [i32],
    /// Dofs per island.
    pub island_nv: &'a [i32],
    /// Constraint rows per island.
    pub island_nefc: &'a [i32],
}

/// Walks one island's intrusive linked list.
#[derive(Clone, Debug)]
pub struct IslandIter<'a> {
    next: &'a [i32],
    cursor: Option<usize>,
}

impl Iterator for IslandIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.cursor?;
        self.cursor = self.next.get(current).and_then(|&slot| slot_index(slot));
        Some(current)
    }
}

/// Per-step simulation data relevant to island discovery.
///
/// Inputs are installed with [`set_constraints`](Self::set_constraints);
/// outputs are produced by [`discover_islands`](crate::discover_islands)
/// and remain readable until the next call, the next
/// [`begin_step`](Self::begin_step), or new constraints.
pub struct Data {
    pub(crate) contacts: Vec<Contact>,
    pub(crate) efc: EfcRows,
    pub(crate) scratch: ScratchStack,
    pub(crate) arena: OutputArena,
    pub(crate) islands: IslandIndex,
    pub(crate) warnings: [WarningStat; NUM_WARNINGS],
}

impl Data {
    /// Create data for `model` with memory sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`] if the config is inconsistent.
    pub fn new(model: &Model, config: &ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self {
            contacts: Vec::new(),
            efc: EfcRows::empty(model.nv),
            scratch: ScratchStack::new(config.scratch_slots, config.max_scratch_slots),
            arena: OutputArena::new(config.arena_slots),
            islands: IslandIndex::default(),
            warnings: [WarningStat::default(); NUM_WARNINGS],
        })
    }

    /// Install this step's contacts and active constraint rows.
    ///
    /// Any previous island index is discarded.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if `model` itself is inconsistent, a row
    /// id or contact geom is out of range for it, or the Jacobian is not
    /// `nefc x nv`.
    pub fn set_constraints(
        &mut self,
        model: &Model,
        contacts: Vec<Contact>,
        efc: EfcRows,
    ) -> Result<(), ModelError> {
        model.validate()?;
        efc.validate(model, &contacts)?;
        self.contacts = contacts;
        self.efc = efc;
        self.islands.clear();
        Ok(())
    }

    /// Start a new step: release all arena allocations and the island
    /// index built on them.
    pub fn begin_step(&mut self) {
        self.arena.reset();
        self.islands.clear();
    }

    /// This step's contacts.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// This step's constraint rows.
    pub fn efc(&self) -> &EfcRows {
        &self.efc
    }

    /// The scratch stack.
    pub fn scratch(&self) -> &ScratchStack {
        &self.scratch
    }

    /// The output arena.
    pub fn arena(&self) -> &OutputArena {
        &self.arena
    }

    /// Mutable output arena, for stages that allocate alongside islands.
    pub fn arena_mut(&mut self) -> &mut OutputArena {
        &mut self.arena
    }

    /// Statistics for one warning kind.
    pub fn warning(&self, warning: Warning) -> WarningStat {
        self.warnings[warning as usize]
    }

    /// Reset all warning statistics.
    pub fn clear_warnings(&mut self) {
        self.warnings = [WarningStat::default(); NUM_WARNINGS];
    }

    /// Number of islands found by the last call.
    pub fn nisland(&self) -> usize {
        self.islands.nisland
    }

    /// All island ids, in ascending order.
    pub fn islands(&self) -> impl Iterator<Item = IslandId> {
        (0..self.islands.nisland as u32).map(IslandId)
    }

    /// The raw output arrays, or `None` when no index was produced.
    pub fn island_arrays(&self) -> Option<IslandArrays<'_>> {
        let s = self.islands.spans.as_ref()?;
        Some(IslandArrays {
            island_dofadr: self.arena.slice(s.island_dofadr),
            dof_island: self.arena.slice(s.dof_island),
            dof_islandnext: self.arena.slice(s.dof_islandnext),
            island_efcadr: self.arena.slice(s.island_efcadr),
            efc_island: self.arena.slice(s.efc_island),
            efc_islandnext: self.arena.slice(s.efc_islandnext),
            tree_island: self.arena.slice(s.tree_island),
            island_ntree: self.arena.slice(s.island_ntree),
            island_nv: self.arena.slice(s.island_nv),
            island_nefc: self.arena.slice(s.island_nefc),
        })
    }

    fn slots(&self, pick: impl Fn(&IslandSpans) -> ArenaSpan) -> &[i32] {
        match &self.islands.spans {
            Some(spans) => self.arena.slice(pick(spans)),
            None => &[],
        }
    }

    fn slot(&self, pick: impl Fn(&IslandSpans) -> ArenaSpan, index: usize) -> i32 {
        self.slots(pick).get(index).copied().unwrap_or(NONE)
    }

    /// Island of `tree`, `None` if no constraint touches it.
    pub fn tree_island(&self, tree: usize) -> Option<IslandId> {
        IslandId::from_slot(self.slot(|s| s.tree_island, tree))
    }

    /// Island of `dof`.
    pub fn dof_island(&self, dof: usize) -> Option<IslandId> {
        IslandId::from_slot(self.slot(|s| s.dof_island, dof))
    }

    /// Next dof after `dof` in its island.
    pub fn dof_islandnext(&self, dof: usize) -> Option<usize> {
        slot_index(self.slot(|s| s.dof_islandnext, dof))
    }

    /// Island of constraint `row`.
    pub fn efc_island(&self, row: usize) -> Option<IslandId> {
        IslandId::from_slot(self.slot(|s| s.efc_island, row))
    }

    /// Next constraint row after `row` in its island.
    pub fn efc_islandnext(&self, row: usize) -> Option<usize> {
        slot_index(self.slot(|s| s.efc_islandnext, row))
    }

    /// First dof of `island`.
    pub fn island_dofadr(&self, island: IslandId) -> Option<usize> {
        slot_index(self.slot(|s| s.island_dofadr, island.index()))
    }

    /// First constraint row of `island`.
    pub fn island_efcadr(&self, island: IslandId) -> Option<usize> {
        slot_index(self.slot(|s| s.island_efcadr, island.index()))
    }

    /// Number of trees in `island`.
    pub fn island_ntree(&self, island: IslandId) -> usize {
        slot_index(self.slot(|s| s.island_ntree, island.index())).unwrap_or(0)
    }

    /// Number of dofs in `island`.
    pub fn island_nv(&self, island: IslandId) -> usize {
        slot_index(self.slot(|s| s.island_nv, island.index())).unwrap_or(0)
    }

    /// Number of constraint rows in `island`.
    pub fn island_nefc(&self, island: IslandId) -> usize {
        slot_index(self.slot(|s| s.island_nefc, island.index())).unwrap_or(0)
    }

    /// Dofs of `island` in ascending order.
    pub fn island_dofs(&self, island: IslandId) -> IslandIter<'_> {
        IslandIter {
            next: self.slots(|s| s.dof_islandnext),
            cursor: self.island_dofadr(island),
        }
    }

    /// Constraint rows of `island` in ascending order.
    pub fn island_efcs(&self, island: IslandId) -> IslandIter<'_> {
        IslandIter {
            next: self.slots(|s| s.efc_islandnext),
            cursor: self.island_efcadr(island),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        Model {
            nv: 3,
            ntree: 2,
            dof_treeid: vec![0, 0, 1],
            body_treeid: vec![None, Some(0), Some(1)],
            geom_bodyid: vec![0, 1, 2],
            jnt_dofadr: vec![0, 2],
            ..Model::default()
        }
    }

    #[test]
    fn fresh_data_has_no_islands() {
        let m = model();
        let d = Data::new(&m, &ArenaConfig::default()).unwrap();
        assert_eq!(d.nisland(), 0);
        assert!(d.island_arrays().is_none());
        assert_eq!(d.dof_island(0), None);
        assert_eq!(d.island_dofs(IslandId(0)).count(), 0);
        assert_eq!(d.efc().nefc(), 0);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = ArenaConfig {
            scratch_slots: 2,
            max_scratch_slots: 1,
            ..ArenaConfig::default()
        };
        assert!(Data::new(&model(), &config).is_err());
    }

    #[test]
    fn set_constraints_validates_model() {
        let mut m = model();
        m.jnt_dofadr[1] = 9;
        let mut d = Data::new(&m, &ArenaConfig::default()).unwrap();
        assert_eq!(
            d.set_constraints(&m, Vec::new(), EfcRows::empty(m.nv)),
            Err(ModelError::IndexOutOfRange {
                array: "jnt_dofadr",
                index: 1,
                value: 9,
                bound: 3,
            })
        );
    }

    #[test]
    fn spans_allocate_in_order_and_fill_sentinels() {
        let mut arena = OutputArena::new(64);
        let spans = IslandSpans::allocate(&mut arena, 3, 2, 2, 1).unwrap();
        assert_eq!(arena.used(), 1 + 3 + 3 + 1 + 2 + 2 + 2 + 1 + 1 + 1);
        assert_eq!(arena.slice(spans.dof_island), &[NONE; 3]);
        assert_eq!(arena.slice(spans.island_nv), &[0]);
    }

    #[test]
    fn spans_allocation_fails_without_room() {
        let mut arena = OutputArena::new(4);
        assert!(matches!(
            IslandSpans::allocate(&mut arena, 3, 2, 2, 1),
            Err(ArenaError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn iterator_follows_next_slots() {
        let next = [2, NONE, 3, NONE];
        let walk: Vec<_> = IslandIter {
            next: &next,
            cursor: Some(0),
        }
        .collect();
        assert_eq!(walk, vec![0, 2, 3]);
    }
}
