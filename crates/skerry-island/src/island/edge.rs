//! Edge extraction: active constraint rows to tree-tree couplings.
//!
//! Edges are stored as directed `(from, to)` slot pairs. A coupling between
//! two distinct trees is written in both orientations; a self-edge is
//! written once. The number of directed entries equals the number of
//! neighbour slots the adjacency needs, so all sizes below are in those
//! units.

use skerry_core::{index_slot, ConstraintType, Contact, EfcRows, EqualityType, Model};

use super::scan::row_trees;
use crate::error::IslandError;

/// Upper bound on the directed edge entries `efc` can produce.
///
/// * contact: two entries per contact
/// * equality: per instance, see [`equality_budget`]
/// * friction or limit row: one entry
/// * tendon: `2 * tendon_num` per enabled limit and per enabled friction
///   loss, covering a chain through up to `tendon_num` trees
///
/// Equality instances are counted the way extraction sees them:
/// consecutive rows sharing an id are one instance.
pub fn edge_bound(model: &Model, ncon: usize, efc: &EfcRows) -> usize {
    let tendons: usize = model
        .tendon_num
        .iter()
        .zip(&model.tendon_limited)
        .zip(&model.tendon_frictionloss)
        .map(|((&num, &limited), &frictionloss)| {
            let enabled = usize::from(limited) + usize::from(frictionloss != 0.0);
            2 * num * enabled
        })
        .sum();

    let mut equalities = 0;
    let mut instance = None;
    for row in 0..efc.nefc() {
        let key = (efc.efc_type(row), efc.efc_id(row));
        if key.0 == ConstraintType::Equality && instance != Some(key) {
            equalities += equality_budget(model, key.1);
        }
        instance = Some(key);
    }

    2 * ncon + equalities + efc.nf() + efc.nl() + tendons
}

/// Directed entries one equality instance can produce.
///
/// Connect and weld link two body trees. A tendon equality reaches at
/// most the wrap objects of both tendons. Anything else is scanned from
/// the Jacobian, where a chain of distinct consecutive trees has fewer
/// than `nv` links.
fn equality_budget(model: &Model, eq: usize) -> usize {
    let reach = 2 * model.nv.max(1);
    match model.eq_type[eq] {
        ty if ty.couples_bodies() => 2,
        EqualityType::Tendon => {
            let num1 = model.tendon_num.get(model.eq_obj1id[eq]);
            let num2 = model.tendon_num.get(model.eq_obj2id[eq]);
            match (num1, num2) {
                (Some(&a), Some(&b)) => (2 * (a + b)).min(reach),
                _ => reach,
            }
        }
        _ => reach,
    }
}

/// Edge buffer with per-tree entry counts.
pub(crate) struct EdgeSink<'a> {
    /// `(from, to)` slot pairs. Length: twice the capacity.
    edges: &'a mut [i32],
    /// Directed entries leaving each tree.
    tree_nedge: &'a mut [i32],
    nedge: usize,
}

impl<'a> EdgeSink<'a> {
    pub(crate) fn new(edges: &'a mut [i32], tree_nedge: &'a mut [i32]) -> Self {
        tree_nedge.fill(0);
        Self {
            edges,
            tree_nedge,
            nedge: 0,
        }
    }

    /// Directed entries written so far.
    pub(crate) fn len(&self) -> usize {
        self.nedge
    }

    fn capacity(&self) -> usize {
        self.edges.len() / 2
    }

    fn last(&self) -> Option<(i32, i32)> {
        let e = self.nedge.checked_sub(1)?;
        Some((self.edges[2 * e], self.edges[2 * e + 1]))
    }

    fn push(&mut self, from: usize, to: usize) {
        let e = self.nedge;
        self.edges[2 * e] = index_slot(from);
        self.edges[2 * e + 1] = index_slot(to);
        self.tree_nedge[from] += 1;
        self.nedge += 1;
    }

    /// Record a coupling between two trees; `None` is the world.
    ///
    /// A coupling to the world becomes a self-edge on the other tree. A
    /// repeat of the previous edge, in either orientation, is dropped.
    pub(crate) fn add(
        &mut self,
        row: usize,
        tree1: Option<usize>,
        tree2: Option<usize>,
    ) -> Result<(), IslandError> {
        let (t1, t2) = match (tree1, tree2) {
            (None, None) => return Err(IslandError::StaticSelfEdge { row }),
            (Some(t), None) | (None, Some(t)) => (t, t),
            (Some(a), Some(b)) => (a, b),
        };
        let (s1, s2) = (index_slot(t1), index_slot(t2));
        let last = self.last();
        if last == Some((s1, s2)) || last == Some((s2, s1)) {
            return Ok(());
        }

        let needed = if t1 == t2 { 1 } else { 2 };
        if self.nedge + needed > self.capacity() {
            return Err(IslandError::EdgeCapacityExceeded {
                capacity: self.capacity(),
            });
        }
        self.push(t1, t2);
        if t1 != t2 {
            self.push(t2, t1);
        }
        Ok(())
    }
}

/// Write the couplings of every constraint instance in `efc` to `sink`.
///
/// Consecutive rows sharing a `(type, id)` pair are one instance and only
/// the first is inspected.
pub(crate) fn extract_edges(
    model: &Model,
    contacts: &[Contact],
    efc: &EfcRows,
    sink: &mut EdgeSink<'_>,
) -> Result<(), IslandError> {
    let mut instance = None;
    for row in 0..efc.nefc() {
        let key = (efc.efc_type(row), efc.efc_id(row));
        if instance == Some(key) {
            continue;
        }
        instance = Some(key);

        let (ty, id) = key;
        match ty {
            ConstraintType::FrictionDof => {
                let tree = model.dof_treeid[id];
                sink.add(row, Some(tree), Some(tree))?;
            }
            ConstraintType::LimitJoint => {
                let tree = model.dof_treeid[model.jnt_dofadr[id]];
                sink.add(row, Some(tree), Some(tree))?;
            }
            ConstraintType::ContactFrictionless
            | ConstraintType::ContactPyramidal
            | ConstraintType::ContactElliptic => {
                let contact = contacts[id];
                sink.add(
                    row,
                    model.geom_tree(contact.geom1),
                    model.geom_tree(contact.geom2),
                )?;
            }
            ConstraintType::Equality if model.eq_type[id].couples_bodies() => {
                sink.add(
                    row,
                    model.body_treeid[model.eq_obj1id[id]],
                    model.body_treeid[model.eq_obj2id[id]],
                )?;
            }
            _ => {
                let trees = row_trees(model, efc.jacobian(), row);
                match trees.as_slice() {
                    [] => return Err(IslandError::EmptyConstraintRow { row }),
                    [tree] => sink.add(row, Some(*tree), Some(*tree))?,
                    chain => {
                        for pair in chain.windows(2) {
                            sink.add(row, Some(pair[0]), Some(pair[1]))?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
