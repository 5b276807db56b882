//! Hand-built models and constraint rows.
//!
//! Every tree gets one body, one joint at its first dof and one geom, and
//! trees are laid out with contiguous dofs. Rows produced by
//! [`RowsBuilder`] have Jacobian entries on every dof of every tree they
//! couple, so a Jacobian scan and the type-specific lookups agree.

use std::ops::Range;

use nalgebra::DMatrix;
use skerry_core::{
    ConstraintType, Contact, EfcRows, EqualityType, Jacobian, Model, SparseJacobian,
};

/// The world body.
pub const WORLD_BODY: usize = 0;

/// A geom attached to the world body.
pub const WORLD_GEOM: usize = 0;

/// Ids of everything created for one tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeHandle {
    pub tree: usize,
    pub body: usize,
    pub geom: usize,
    pub joint: usize,
    pub dofs: Range<usize>,
}

/// Incremental [`Model`] construction.
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    /// A model holding only the world body and one world geom.
    pub fn new() -> Self {
        Self {
            model: Model {
                body_treeid: vec![None],
                geom_bodyid: vec![WORLD_BODY],
                ..Model::default()
            },
        }
    }

    /// Add a tree with `ndof` dofs.
    pub fn tree(&mut self, ndof: usize) -> TreeHandle {
        assert!(ndof > 0, "a tree needs at least one dof");
        let m = &mut self.model;
        let tree = m.ntree;
        let body = m.body_treeid.len();
        let geom = m.geom_bodyid.len();
        let joint = m.jnt_dofadr.len();
        let dofs = m.nv..m.nv + ndof;

        m.ntree += 1;
        m.body_treeid.push(Some(tree));
        m.geom_bodyid.push(body);
        m.jnt_dofadr.push(dofs.start);
        m.dof_treeid.extend(std::iter::repeat_n(tree, ndof));
        m.nv += ndof;

        TreeHandle {
            tree,
            body,
            geom,
            joint,
            dofs,
        }
    }

    /// Add `n` trees with `ndof` dofs each.
    pub fn trees(&mut self, n: usize, ndof: usize) -> Vec<TreeHandle> {
        (0..n).map(|_| self.tree(ndof)).collect()
    }

    /// Add an extra geom on the world body.
    pub fn world_geom(&mut self) -> usize {
        self.model.geom_bodyid.push(WORLD_BODY);
        self.model.geom_bodyid.len() - 1
    }

    /// Add an equality constraint.
    pub fn equality(&mut self, ty: EqualityType, obj1: usize, obj2: usize) -> usize {
        let m = &mut self.model;
        m.eq_type.push(ty);
        m.eq_obj1id.push(obj1);
        m.eq_obj2id.push(obj2);
        m.eq_type.len() - 1
    }

    /// Add a tendon with `num` wrap objects.
    pub fn tendon(&mut self, num: usize, limited: bool, frictionloss: f64) -> usize {
        let m = &mut self.model;
        m.tendon_num.push(num);
        m.tendon_limited.push(limited);
        m.tendon_frictionloss.push(frictionloss);
        m.tendon_num.len() - 1
    }

    /// Set `DISABLE_*` flags.
    pub fn disable(&mut self, flags: u32) -> &mut Self {
        self.model.opt.disableflags |= flags;
        self
    }

    pub fn build(&self) -> Model {
        self.model.clone()
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct Row {
    ty: ConstraintType,
    id: usize,
    dofs: Vec<usize>,
}

/// Constraint rows and contacts for a fixed model.
///
/// Rows are emitted in call order. Each call adds every row of one
/// constraint instance, so rows of one instance are consecutive.
pub struct RowsBuilder<'m> {
    model: &'m Model,
    contacts: Vec<Contact>,
    rows: Vec<Row>,
}

impl<'m> RowsBuilder<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            contacts: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Dofs of the given trees, ascending. `None` entries are the world
    /// and contribute nothing.
    fn tree_dofs(&self, trees: impl IntoIterator<Item = Option<usize>>) -> Vec<usize> {
        let trees: Vec<usize> = trees.into_iter().flatten().collect();
        (0..self.model.nv)
            .filter(|&dof| trees.contains(&self.model.dof_treeid[dof]))
            .collect()
    }

    fn push(&mut self, ty: ConstraintType, id: usize, nrows: usize, dofs: Vec<usize>) {
        for _ in 0..nrows {
            self.rows.push(Row {
                ty,
                id,
                dofs: dofs.clone(),
            });
        }
    }

    /// A contact between two geoms with `nrows` rows of kind `ty`.
    pub fn contact(
        &mut self,
        geom1: usize,
        geom2: usize,
        ty: ConstraintType,
        nrows: usize,
    ) -> usize {
        assert!(ty.is_contact(), "{ty:?} is not a contact kind");
        let id = self.contacts.len();
        self.contacts.push(Contact::new(geom1, geom2));
        let dofs = self.tree_dofs([self.model.geom_tree(geom1), self.model.geom_tree(geom2)]);
        self.push(ty, id, nrows, dofs);
        id
    }

    /// A single-row frictionless contact.
    pub fn frictionless(&mut self, geom1: usize, geom2: usize) -> usize {
        self.contact(geom1, geom2, ConstraintType::ContactFrictionless, 1)
    }

    /// Friction loss on one dof.
    pub fn joint_friction(&mut self, dof: usize) -> &mut Self {
        let tree = self.model.dof_treeid[dof];
        let dofs = self.tree_dofs([Some(tree)]);
        self.push(ConstraintType::FrictionDof, dof, 1, dofs);
        self
    }

    /// Limit on one joint.
    pub fn joint_limit(&mut self, joint: usize) -> &mut Self {
        let tree = self.model.dof_treeid[self.model.jnt_dofadr[joint]];
        let dofs = self.tree_dofs([Some(tree)]);
        self.push(ConstraintType::LimitJoint, joint, 1, dofs);
        self
    }

    /// A connect or weld equality, with rows on both bodies' trees.
    pub fn body_equality(&mut self, eq: usize) -> &mut Self {
        let m = self.model;
        let nrows = match m.eq_type[eq] {
            EqualityType::Connect => 3,
            EqualityType::Weld => 6,
            other => panic!("{other:?} does not couple bodies"),
        };
        let dofs = self.tree_dofs([
            m.body_treeid[m.eq_obj1id[eq]],
            m.body_treeid[m.eq_obj2id[eq]],
        ]);
        self.push(ConstraintType::Equality, eq, nrows, dofs);
        self
    }

    /// An equality of any kind with `nrows` rows spanning `trees`.
    pub fn equality_over(&mut self, eq: usize, trees: &[usize], nrows: usize) -> &mut Self {
        let dofs = self.tree_dofs(trees.iter().copied().map(Some));
        self.push(ConstraintType::Equality, eq, nrows, dofs);
        self
    }

    /// A tendon limit row spanning `trees`.
    pub fn tendon_limit(&mut self, tendon: usize, trees: &[usize]) -> &mut Self {
        let dofs = self.tree_dofs(trees.iter().copied().map(Some));
        self.push(ConstraintType::LimitTendon, tendon, 1, dofs);
        self
    }

    /// A tendon friction row spanning `trees`.
    pub fn tendon_friction(&mut self, tendon: usize, trees: &[usize]) -> &mut Self {
        let dofs = self.tree_dofs(trees.iter().copied().map(Some));
        self.push(ConstraintType::FrictionTendon, tendon, 1, dofs);
        self
    }

    /// A raw row with entries on exactly `dofs`.
    pub fn raw(&mut self, ty: ConstraintType, id: usize, dofs: &[usize]) -> &mut Self {
        self.push(ty, id, 1, dofs.to_vec());
        self
    }

    pub fn nefc(&self) -> usize {
        self.rows.len()
    }

    fn dense(&self) -> DMatrix<f64> {
        let mut jac = DMatrix::zeros(self.rows.len(), self.model.nv);
        for (r, row) in self.rows.iter().enumerate() {
            for &dof in &row.dofs {
                jac[(r, dof)] = 1.0 + (dof % 3) as f64;
            }
        }
        jac
    }

    fn assemble(&self, jacobian: Jacobian) -> (Vec<Contact>, EfcRows) {
        let efc = EfcRows::new(
            self.rows.iter().map(|r| r.ty).collect(),
            self.rows.iter().map(|r| r.id).collect(),
            jacobian,
        )
        .expect("builder rows are consistent");
        (self.contacts.clone(), efc)
    }

    /// Contacts and rows with a dense Jacobian.
    pub fn build(&self) -> (Vec<Contact>, EfcRows) {
        self.assemble(Jacobian::Dense(self.dense()))
    }

    /// Contacts and rows with a sparse Jacobian.
    pub fn build_sparse(&self) -> (Vec<Contact>, EfcRows) {
        let mut sparse = SparseJacobian::new(self.model.nv);
        for row in &self.rows {
            let entries: Vec<(usize, f64)> =
                row.dofs.iter().map(|&d| (d, 1.0 + (d % 3) as f64)).collect();
            sparse.push_row(&entries).expect("builder dofs are in range");
        }
        self.assemble(Jacobian::Sparse(sparse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trees_get_contiguous_dofs() {
        let mut b = ModelBuilder::new();
        let a = b.tree(2);
        let c = b.tree(3);
        let m = b.build();
        assert_eq!(a.dofs, 0..2);
        assert_eq!(c.dofs, 2..5);
        assert_eq!(m.dof_treeid, vec![0, 0, 1, 1, 1]);
        assert_eq!(m.geom_tree(c.geom), Some(1));
        assert_eq!(m.geom_tree(WORLD_GEOM), None);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn contact_rows_touch_both_trees() {
        let mut b = ModelBuilder::new();
        let t = b.trees(3, 1);
        let m = b.build();
        let mut rows = RowsBuilder::new(&m);
        rows.contact(t[0].geom, t[2].geom, ConstraintType::ContactPyramidal, 4);
        let (contacts, efc) = rows.build();
        assert_eq!(contacts.len(), 1);
        assert_eq!(efc.nefc(), 4);
        assert_eq!(efc.jacobian().row_dofs(3).collect::<Vec<_>>(), vec![0, 2]);
        assert!(efc.validate(&m, &contacts).is_ok());
    }

    #[test]
    fn sparse_and_dense_agree() {
        let mut b = ModelBuilder::new();
        let t = b.trees(2, 2);
        let m = b.build();
        let mut rows = RowsBuilder::new(&m);
        rows.frictionless(WORLD_GEOM, t[1].geom);
        rows.joint_limit(t[0].joint);
        let (_, dense) = rows.build();
        let (_, sparse) = rows.build_sparse();
        assert_eq!(dense.jacobian().to_sparse(), *sparse.jacobian());
    }
}
