//! Active constraint rows and the contacts they reference.
//!
//! Each scalar row carries a `(type, id)` pair naming the constraint
//! instance it was instantiated from. Consecutive rows may share a pair
//! (a pyramidal friction cone produces several rows per contact).

use crate::error::ModelError;
use crate::jacobian::Jacobian;
use crate::model::Model;

/// Kind of constraint a row belongs to. Determines what `efc_id` indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintType {
    /// Equality constraint. `id` is an equality index.
    Equality,
    /// Dof friction loss. `id` is a dof index.
    FrictionDof,
    /// Tendon friction loss. `id` is a tendon index.
    FrictionTendon,
    /// Joint limit. `id` is a joint index.
    LimitJoint,
    /// Tendon limit. `id` is a tendon index.
    LimitTendon,
    /// Frictionless contact. `id` is a contact index.
    ContactFrictionless,
    /// Pyramidal friction cone facet. `id` is a contact index.
    ContactPyramidal,
    /// Elliptic friction cone row. `id` is a contact index.
    ContactElliptic,
}

impl ConstraintType {
    /// Whether `id` indexes the contact list.
    pub fn is_contact(self) -> bool {
        matches!(
            self,
            Self::ContactFrictionless | Self::ContactPyramidal | Self::ContactElliptic
        )
    }

    /// Whether the row is a friction-loss row (dof or tendon).
    pub fn is_friction(self) -> bool {
        matches!(self, Self::FrictionDof | Self::FrictionTendon)
    }

    /// Whether the row is a limit row (joint or tendon).
    pub fn is_limit(self) -> bool {
        matches!(self, Self::LimitJoint | Self::LimitTendon)
    }
}

/// A detected contact between two geoms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    /// First geom.
    pub geom1: usize,
    /// Second geom.
    pub geom2: usize,
}

impl Contact {
    /// Contact between `geom1` and `geom2`.
    pub fn new(geom1: usize, geom2: usize) -> Self {
        Self { geom1, geom2 }
    }
}

/// The active constraint rows of one step.
///
/// Holds the per-row `(type, id)` stream, the Jacobian and the per-kind
/// row counts.
#[derive(Clone, Debug, PartialEq)]
pub struct EfcRows {
    efc_type: Vec<ConstraintType>,
    efc_id: Vec<usize>,
    jacobian: Jacobian,
    ne: usize,
    nf: usize,
    nl: usize,
}

impl EfcRows {
    /// No active rows.
    pub fn empty(nv: usize) -> Self {
        Self {
            efc_type: Vec::new(),
            efc_id: Vec::new(),
            jacobian: Jacobian::empty(nv),
            ne: 0,
            nf: 0,
            nl: 0,
        }
    }

    /// Assemble rows, deriving the equality, friction and limit row counts.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::LengthMismatch`] if `efc_type` and `efc_id`
    /// differ in length, or [`ModelError::JacobianShape`] if the Jacobian
    /// does not have one row per constraint.
    pub fn new(
        efc_type: Vec<ConstraintType>,
        efc_id: Vec<usize>,
        jacobian: Jacobian,
    ) -> Result<Self, ModelError> {
        if efc_id.len() != efc_type.len() {
            return Err(ModelError::LengthMismatch {
                array: "efc_id",
                expected: efc_type.len(),
                actual: efc_id.len(),
            });
        }
        if jacobian.nrows() != efc_type.len() {
            return Err(ModelError::JacobianShape {
                rows: jacobian.nrows(),
                cols: jacobian.ncols(),
                expected_rows: efc_type.len(),
                expected_cols: jacobian.ncols(),
            });
        }
        let ne = efc_type
            .iter()
            .filter(|&&t| t == ConstraintType::Equality)
            .count();
        let nf = efc_type.iter().filter(|t| t.is_friction()).count();
        let nl = efc_type.iter().filter(|t| t.is_limit()).count();
        Ok(Self {
            efc_type,
            efc_id,
            jacobian,
            ne,
            nf,
            nl,
        })
    }

    /// Number of active rows.
    pub fn nefc(&self) -> usize {
        self.efc_type.len()
    }

    /// Number of equality rows.
    pub fn ne(&self) -> usize {
        self.ne
    }

    /// Number of friction-loss rows.
    pub fn nf(&self) -> usize {
        self.nf
    }

    /// Number of limit rows.
    pub fn nl(&self) -> usize {
        self.nl
    }

    /// Constraint kind of `row`.
    pub fn efc_type(&self, row: usize) -> ConstraintType {
        self.efc_type[row]
    }

    /// Constraint instance of `row`.
    pub fn efc_id(&self, row: usize) -> usize {
        self.efc_id[row]
    }

    /// The constraint Jacobian.
    pub fn jacobian(&self) -> &Jacobian {
        &self.jacobian
    }

    /// The same rows with the Jacobian converted to the other layout.
    pub fn with_jacobian(&self, jacobian: Jacobian) -> Result<Self, ModelError> {
        Self::new(self.efc_type.clone(), self.efc_id.clone(), jacobian)
    }

    /// Check every row against `model` and the contact list.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::JacobianShape`] if the Jacobian does not have
    /// `nv` columns, or [`ModelError::IndexOutOfRange`] for an id that does
    /// not name an instance of its constraint kind.
    pub fn validate(&self, model: &Model, contacts: &[Contact]) -> Result<(), ModelError> {
        if self.nefc() > i32::MAX as usize {
            return Err(ModelError::TooLarge {
                what: "nefc",
                count: self.nefc(),
            });
        }
        if self.jacobian.ncols() != model.nv {
            return Err(ModelError::JacobianShape {
                rows: self.jacobian.nrows(),
                cols: self.jacobian.ncols(),
                expected_rows: self.nefc(),
                expected_cols: model.nv,
            });
        }
        for (index, geom) in contacts
            .iter()
            .flat_map(|c| [c.geom1, c.geom2])
            .enumerate()
        {
            if geom >= model.ngeom() {
                return Err(ModelError::IndexOutOfRange {
                    array: "contact_geom",
                    index: index / 2,
                    value: geom,
                    bound: model.ngeom(),
                });
            }
        }
        for (row, (&ty, &id)) in self.efc_type.iter().zip(&self.efc_id).enumerate() {
            let bound = match ty {
                ConstraintType::Equality => model.neq(),
                ConstraintType::FrictionDof => model.nv,
                ConstraintType::FrictionTendon | ConstraintType::LimitTendon => model.ntendon(),
                ConstraintType::LimitJoint => model.njnt(),
                _ => contacts.len(),
            };
            if id >= bound {
                return Err(ModelError::IndexOutOfRange {
                    array: "efc_id",
                    index: row,
                    value: id,
                    bound,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn one_tree_model() -> Model {
        Model {
            nv: 2,
            ntree: 1,
            dof_treeid: vec![0, 0],
            body_treeid: vec![None, Some(0)],
            geom_bodyid: vec![0, 1],
            jnt_dofadr: vec![0],
            ..Model::default()
        }
    }

    #[test]
    fn counts_rows_per_kind() {
        let types = vec![
            ConstraintType::Equality,
            ConstraintType::Equality,
            ConstraintType::FrictionDof,
            ConstraintType::FrictionTendon,
            ConstraintType::LimitJoint,
            ConstraintType::ContactPyramidal,
        ];
        let rows = EfcRows::new(types, vec![0; 6], Jacobian::Dense(DMatrix::zeros(6, 2))).unwrap();
        assert_eq!(rows.nefc(), 6);
        assert_eq!(rows.ne(), 2);
        assert_eq!(rows.nf(), 2);
        assert_eq!(rows.nl(), 1);
    }

    #[test]
    fn row_count_must_match_jacobian() {
        let err = EfcRows::new(
            vec![ConstraintType::LimitJoint],
            vec![0],
            Jacobian::empty(2),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::JacobianShape { rows: 0, .. }));
    }

    #[test]
    fn validate_checks_ids_per_kind() {
        let m = one_tree_model();
        let rows = EfcRows::new(
            vec![ConstraintType::LimitJoint],
            vec![1],
            Jacobian::Dense(DMatrix::zeros(1, 2)),
        )
        .unwrap();
        assert!(matches!(
            rows.validate(&m, &[]),
            Err(ModelError::IndexOutOfRange {
                array: "efc_id",
                bound: 1,
                ..
            })
        ));
    }

    #[test]
    fn validate_checks_contact_geoms() {
        let m = one_tree_model();
        let rows = EfcRows::empty(2);
        assert!(rows.validate(&m, &[Contact::new(0, 1)]).is_ok());
        assert!(rows.validate(&m, &[Contact::new(0, 5)]).is_err());
    }

    #[test]
    fn validate_checks_jacobian_width() {
        let m = one_tree_model();
        let rows = EfcRows::empty(3);
        assert!(matches!(
            rows.validate(&m, &[]),
            Err(ModelError::JacobianShape { expected_cols: 2, .. })
        ));
    }

    #[test]
    fn contact_kinds() {
        assert!(ConstraintType::ContactElliptic.is_contact());
        assert!(!ConstraintType::LimitTendon.is_contact());
        assert!(ConstraintType::FrictionTendon.is_friction());
    }
}
