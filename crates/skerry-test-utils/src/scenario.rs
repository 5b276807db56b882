//! Seeded random scenarios covering every constraint kind.
//!
//! Rows are emitted in solver order: equalities, friction, limits, then
//! contacts. Tendon rows span up to `tendon_num` trees, tendon equality
//! rows the trees of both tendons, and flex equality rows any subset of
//! trees.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use skerry_arena::ArenaConfig;
use skerry_core::{ConstraintType, Contact, EfcRows, EqualityType, Model};
use skerry_island::Data;

use crate::builder::{ModelBuilder, RowsBuilder, TreeHandle, WORLD_BODY, WORLD_GEOM};

/// Sizes of a generated scenario. Instance counts are upper bounds; each
/// is drawn uniformly from `0..=max`.
#[derive(Clone, Debug)]
pub struct ScenarioParams {
    pub ntree: usize,
    pub max_tree_dofs: usize,
    pub max_contacts: usize,
    pub max_equalities: usize,
    pub max_joint_friction: usize,
    pub max_joint_limits: usize,
    pub max_tendons: usize,
    pub max_tendon_num: usize,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            ntree: 8,
            max_tree_dofs: 3,
            max_contacts: 8,
            max_equalities: 3,
            max_joint_friction: 3,
            max_joint_limits: 3,
            max_tendons: 2,
            max_tendon_num: 4,
        }
    }
}

/// A model plus one step's contacts and rows.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub model: Model,
    pub contacts: Vec<Contact>,
    /// Rows with a dense Jacobian.
    pub efc: EfcRows,
}

impl Scenario {
    /// The same rows with a sparse Jacobian.
    pub fn sparse_efc(&self) -> EfcRows {
        self.efc
            .with_jacobian(self.efc.jacobian().to_sparse())
            .expect("layout change preserves shape")
    }

    /// Data holding this scenario's constraints.
    pub fn data(&self, config: &ArenaConfig, sparse: bool) -> Data {
        let efc = if sparse {
            self.sparse_efc()
        } else {
            self.efc.clone()
        };
        let mut data = Data::new(&self.model, config).expect("valid arena config");
        data.set_constraints(&self.model, self.contacts.clone(), efc)
            .expect("generated rows are valid");
        data
    }
}

/// Generate a scenario from `seed`. Identical seeds give identical
/// scenarios.
pub fn random_scenario(seed: u64, params: &ScenarioParams) -> Scenario {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut builder = ModelBuilder::new();
    let trees: Vec<TreeHandle> = (0..params.ntree)
        .map(|_| builder.tree(rng.random_range(1..=params.max_tree_dofs.max(1))))
        .collect();

    if trees.is_empty() {
        let model = builder.build();
        let (contacts, efc) = RowsBuilder::new(&model).build();
        return Scenario {
            model,
            contacts,
            efc,
        };
    }

    // Model-level instances.
    let pick = |rng: &mut ChaCha8Rng| rng.random_range(0..trees.len());
    let span = |rng: &mut ChaCha8Rng, max: usize| {
        let mut spanned: Vec<usize> = (0..rng.random_range(1..=max.max(1)))
            .map(|_| pick(rng))
            .collect();
        spanned.sort_unstable();
        spanned.dedup();
        spanned
    };

    let mut tendons = Vec::new();
    for _ in 0..rng.random_range(0..=params.max_tendons) {
        let spanned = span(&mut rng, params.max_tendon_num);
        let num = spanned.len().max(rng.random_range(1..=params.max_tendon_num.max(1)));
        let limited = rng.random_bool(0.5);
        let frictionloss = if rng.random_bool(0.5) { 0.1 } else { 0.0 };
        let id = builder.tendon(num, limited, frictionloss);
        tendons.push((id, spanned, limited, frictionloss != 0.0));
    }

    let mut equalities: Vec<(usize, Vec<usize>)> = Vec::new();
    for _ in 0..rng.random_range(0..=params.max_equalities) {
        let t1 = pick(&mut rng);
        let t2 = pick(&mut rng);
        let eq = match rng.random_range(0..5) {
            0 => {
                let other = if rng.random_bool(0.25) {
                    WORLD_BODY
                } else {
                    trees[t2].body
                };
                (builder.equality(EqualityType::Connect, trees[t1].body, other), vec![])
            }
            1 => (
                builder.equality(EqualityType::Weld, trees[t1].body, trees[t2].body),
                vec![],
            ),
            2 => {
                let mut spanned = vec![t1, t2];
                spanned.sort_unstable();
                spanned.dedup();
                let (j1, j2) = (trees[t1].joint, trees[t2].joint);
                (builder.equality(EqualityType::Joint, j1, j2), spanned)
            }
            3 if !tendons.is_empty() => {
                // Rows reach every tree either tendon wraps.
                let (a, spanned_a, _, _) = &tendons[rng.random_range(0..tendons.len())];
                let (b, spanned_b, _, _) = &tendons[rng.random_range(0..tendons.len())];
                let mut spanned: Vec<usize> =
                    spanned_a.iter().chain(spanned_b).copied().collect();
                spanned.sort_unstable();
                spanned.dedup();
                (builder.equality(EqualityType::Tendon, *a, *b), spanned)
            }
            _ => {
                let spanned = span(&mut rng, trees.len());
                (builder.equality(EqualityType::Flex, 0, 0), spanned)
            }
        };
        equalities.push(eq);
    }

    let model = builder.build();
    let mut rows = RowsBuilder::new(&model);

    for (eq, spanned) in &equalities {
        if model.eq_type[*eq].couples_bodies() {
            rows.body_equality(*eq);
        } else {
            let nrows = rng.random_range(1..=2);
            rows.equality_over(*eq, spanned, nrows);
        }
    }

    for _ in 0..rng.random_range(0..=params.max_joint_friction) {
        rows.joint_friction(rng.random_range(0..model.nv));
    }
    for (id, spanned, _, friction) in &tendons {
        if *friction {
            rows.tendon_friction(*id, spanned);
        }
    }

    for _ in 0..rng.random_range(0..=params.max_joint_limits) {
        rows.joint_limit(rng.random_range(0..model.njnt()));
    }
    for (id, spanned, limited, _) in &tendons {
        if *limited {
            rows.tendon_limit(*id, spanned);
        }
    }

    for _ in 0..rng.random_range(0..=params.max_contacts) {
        let geom1 = rng.random_range(0..model.ngeom());
        let geom2 = if geom1 == WORLD_GEOM {
            trees[pick(&mut rng)].geom
        } else {
            rng.random_range(0..model.ngeom())
        };
        let (ty, nrows) = match rng.random_range(0..3) {
            0 => (ConstraintType::ContactFrictionless, 1),
            1 => (ConstraintType::ContactPyramidal, rng.random_range(2..=4)),
            _ => (ConstraintType::ContactElliptic, 3),
        };
        rows.contact(geom1, geom2, ty, nrows);
    }

    let (contacts, efc) = rows.build();
    Scenario {
        model,
        contacts,
        efc,
    }
}
