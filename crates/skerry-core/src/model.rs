//! Kinematic-tree topology consumed by island discovery.
//!
//! A [`Model`] is immutable for the duration of a decomposition call. It
//! carries only the maps the decomposition reads: which tree each dof and
//! body belongs to, which body each geom is attached to, joint dof
//! addresses, and equality and tendon descriptors.

use crate::error::ModelError;

/// Disable island discovery. A call with this flag set behaves as if there
/// were no active constraints.
pub const DISABLE_ISLAND: u32 = 1 << 0;

/// Equality constraint kind.
///
/// Only [`Connect`](Self::Connect) and [`Weld`](Self::Weld) reference two
/// bodies directly; every other kind is resolved by scanning the
/// constraint Jacobian.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EqualityType {
    /// Two body points coincide. `obj1`/`obj2` are body ids.
    #[default]
    Connect,
    /// Two body frames coincide. `obj1`/`obj2` are body ids.
    Weld,
    /// Polynomial coupling between two joints.
    Joint,
    /// Polynomial coupling between two tendons.
    Tendon,
    /// Flex edge lengths.
    Flex,
    /// Distance between two geoms.
    Distance,
}

impl EqualityType {
    /// Whether `obj1`/`obj2` name bodies, allowing direct tree lookup.
    pub fn couples_bodies(self) -> bool {
        matches!(self, Self::Connect | Self::Weld)
    }
}

/// Simulation options relevant to island discovery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelOptions {
    /// Bitmask of `DISABLE_*` flags.
    pub disableflags: u32,
}

/// Read-only tree topology.
///
/// The world body has no tree: its `body_treeid` entry is `None`. Every
/// dof belongs to exactly one tree, and the dofs of one tree are expected
/// to be contiguous (trees are numbered in depth-first body order).
#[derive(Clone, Debug, Default)]
pub struct Model {
    /// Number of degrees of freedom.
    pub nv: usize,
    /// Number of kinematic trees (the world is not counted).
    pub ntree: usize,
    /// Tree of each dof. Length: `nv`.
    pub dof_treeid: Vec<usize>,
    /// Tree of each body, `None` for bodies welded to the world.
    pub body_treeid: Vec<Option<usize>>,
    /// Body each geom is attached to.
    pub geom_bodyid: Vec<usize>,
    /// First dof of each joint.
    pub jnt_dofadr: Vec<usize>,
    /// Kind of each equality constraint.
    pub eq_type: Vec<EqualityType>,
    /// First object of each equality constraint.
    pub eq_obj1id: Vec<usize>,
    /// Second object of each equality constraint.
    pub eq_obj2id: Vec<usize>,
    /// Number of wrap objects (joints, sites, geoms) of each tendon.
    pub tendon_num: Vec<usize>,
    /// Whether each tendon has length limits.
    pub tendon_limited: Vec<bool>,
    /// Friction loss of each tendon; non-zero enables friction rows.
    pub tendon_frictionloss: Vec<f64>,
    /// Simulation options.
    pub opt: ModelOptions,
}

impl Model {
    /// Number of bodies, including the world.
    pub fn nbody(&self) -> usize {
        self.body_treeid.len()
    }

    /// Number of geoms.
    pub fn ngeom(&self) -> usize {
        self.geom_bodyid.len()
    }

    /// Number of joints.
    pub fn njnt(&self) -> usize {
        self.jnt_dofadr.len()
    }

    /// Number of equality constraints.
    pub fn neq(&self) -> usize {
        self.eq_type.len()
    }

    /// Number of tendons.
    pub fn ntendon(&self) -> usize {
        self.tendon_num.len()
    }

    /// Whether the given `DISABLE_*` flag is set.
    pub fn is_disabled(&self, flag: u32) -> bool {
        self.opt.disableflags & flag != 0
    }

    /// Tree of the body `geom` is attached to, `None` for world geoms.
    pub fn geom_tree(&self, geom: usize) -> Option<usize> {
        self.body_treeid[self.geom_bodyid[geom]]
    }

    /// Check array lengths and index ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violation found. A model that passes is safe to
    /// index with any id that [`EfcRows`](crate::EfcRows) validation
    /// accepted.
    pub fn validate(&self) -> Result<(), ModelError> {
        let limit = i32::MAX as usize;
        for (what, count) in [
            ("nv", self.nv),
            ("ntree", self.ntree),
            ("nbody", self.nbody()),
        ] {
            if count > limit {
                return Err(ModelError::TooLarge { what, count });
            }
        }

        expect_len("dof_treeid", self.nv, self.dof_treeid.len())?;
        expect_len("eq_obj1id", self.neq(), self.eq_obj1id.len())?;
        expect_len("eq_obj2id", self.neq(), self.eq_obj2id.len())?;
        expect_len("tendon_limited", self.ntendon(), self.tendon_limited.len())?;
        expect_len(
            "tendon_frictionloss",
            self.ntendon(),
            self.tendon_frictionloss.len(),
        )?;

        expect_below("dof_treeid", &self.dof_treeid, self.ntree)?;
        for (index, tree) in self.body_treeid.iter().enumerate() {
            if let Some(tree) = *tree {
                if tree >= self.ntree {
                    return Err(ModelError::IndexOutOfRange {
                        array: "body_treeid",
                        index,
                        value: tree,
                        bound: self.ntree,
                    });
                }
            }
        }
        expect_below("geom_bodyid", &self.geom_bodyid, self.nbody())?;
        expect_below("jnt_dofadr", &self.jnt_dofadr, self.nv)?;

        for eq in 0..self.neq() {
            let bound = match self.eq_type[eq] {
                ty if ty.couples_bodies() => self.nbody(),
                EqualityType::Tendon => self.ntendon(),
                _ => continue,
            };
            for (array, ids) in [("eq_obj1id", &self.eq_obj1id), ("eq_obj2id", &self.eq_obj2id)] {
                if ids[eq] >= bound {
                    return Err(ModelError::IndexOutOfRange {
                        array,
                        index: eq,
                        value: ids[eq],
                        bound,
                    });
                }
            }
        }
        Ok(())
    }
}

fn expect_len(array: &'static str, expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::LengthMismatch {
            array,
            expected,
            actual,
        })
    }
}

fn expect_below(array: &'static str, values: &[usize], bound: usize) -> Result<(), ModelError> {
    match values.iter().position(|&v| v >= bound) {
        Some(index) => Err(ModelError::IndexOutOfRange {
            array,
            index,
            value: values[index],
            bound,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// World body plus two single-body trees with two dofs each.
    fn two_tree_model() -> Model {
        Model {
            nv: 4,
            ntree: 2,
            dof_treeid: vec![0, 0, 1, 1],
            body_treeid: vec![None, Some(0), Some(1)],
            geom_bodyid: vec![0, 1, 2],
            jnt_dofadr: vec![0, 2],
            ..Model::default()
        }
    }

    #[test]
    fn valid_model_passes() {
        assert_eq!(two_tree_model().validate(), Ok(()));
    }

    #[test]
    fn counts_derive_from_arrays() {
        let m = two_tree_model();
        assert_eq!(m.nbody(), 3);
        assert_eq!(m.ngeom(), 3);
        assert_eq!(m.njnt(), 2);
        assert_eq!(m.neq(), 0);
        assert_eq!(m.ntendon(), 0);
    }

    #[test]
    fn world_geom_has_no_tree() {
        let m = two_tree_model();
        assert_eq!(m.geom_tree(0), None);
        assert_eq!(m.geom_tree(2), Some(1));
    }

    #[test]
    fn dof_tree_out_of_range_rejected() {
        let mut m = two_tree_model();
        m.dof_treeid[3] = 2;
        assert_eq!(
            m.validate(),
            Err(ModelError::IndexOutOfRange {
                array: "dof_treeid",
                index: 3,
                value: 2,
                bound: 2,
            })
        );
    }

    #[test]
    fn dof_treeid_length_checked() {
        let mut m = two_tree_model();
        m.nv = 5;
        assert!(matches!(
            m.validate(),
            Err(ModelError::LengthMismatch {
                array: "dof_treeid",
                ..
            })
        ));
    }

    #[test]
    fn weld_body_ids_checked() {
        let mut m = two_tree_model();
        m.eq_type = vec![EqualityType::Weld];
        m.eq_obj1id = vec![1];
        m.eq_obj2id = vec![7];
        assert!(matches!(
            m.validate(),
            Err(ModelError::IndexOutOfRange {
                array: "eq_obj2id",
                ..
            })
        ));
    }

    #[test]
    fn tendon_equality_ids_checked_against_tendons() {
        let mut m = two_tree_model();
        m.tendon_num = vec![2];
        m.tendon_limited = vec![false];
        m.tendon_frictionloss = vec![0.0];
        m.eq_type = vec![EqualityType::Tendon];
        m.eq_obj1id = vec![0];
        m.eq_obj2id = vec![1];
        assert_eq!(
            m.validate(),
            Err(ModelError::IndexOutOfRange {
                array: "eq_obj2id",
                index: 0,
                value: 1,
                bound: 1,
            })
        );
    }

    #[test]
    fn joint_equality_ids_not_checked_against_bodies() {
        let mut m = two_tree_model();
        m.eq_type = vec![EqualityType::Joint];
        m.eq_obj1id = vec![0];
        m.eq_obj2id = vec![1];
        assert_eq!(m.validate(), Ok(()));
    }

    #[test]
    fn disable_flag_query() {
        let mut m = two_tree_model();
        assert!(!m.is_disabled(DISABLE_ISLAND));
        m.opt.disableflags |= DISABLE_ISLAND;
        assert!(m.is_disabled(DISABLE_ISLAND));
    }
}
