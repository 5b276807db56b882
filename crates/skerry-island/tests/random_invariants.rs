//! Integration test: structural invariants on randomly generated steps.
//!
//! Every successful call must produce an index whose tree partition is
//! the Jacobian's connected components, with consistent dof and row
//! assignments and well-formed lists. Any arena size must either fit the
//! whole index or leave it cleared, with no rows left, and a warning.

use proptest::prelude::*;
use skerry_arena::ArenaConfig;
use skerry_island::{discover_islands, Warning};
use skerry_test_utils::{check_island_invariants, random_scenario, ScenarioParams};

fn params() -> impl Strategy<Value = ScenarioParams> {
    (1usize..16, 1usize..4, 0usize..20, 0usize..6, 0usize..4).prop_map(
        |(ntree, max_tree_dofs, max_contacts, max_equalities, max_tendons)| ScenarioParams {
            ntree,
            max_tree_dofs,
            max_contacts,
            max_equalities,
            max_tendons,
            ..ScenarioParams::default()
        },
    )
}

proptest! {
    #[test]
    fn index_satisfies_invariants(seed in any::<u64>(), p in params(), sparse in any::<bool>()) {
        let s = random_scenario(seed, &p);
        let mut data = s.data(&ArenaConfig::default(), sparse);
        prop_assert!(discover_islands(&s.model, &mut data).is_ok());
        prop_assert_eq!(data.scratch().used(), 0);
        if data.efc().nefc() == 0 {
            prop_assert_eq!(data.nisland(), 0);
        } else {
            prop_assert!(data.nisland() > 0);
            prop_assert_eq!(check_island_invariants(&s.model, &data), Ok(()));
        }
    }

    #[test]
    fn small_arena_fits_or_warns(seed in any::<u64>(), p in params(), slots in 0usize..96) {
        let s = random_scenario(seed, &p);
        let mut data = s.data(&ArenaConfig::new(slots), false);
        prop_assert!(discover_islands(&s.model, &mut data).is_ok());
        prop_assert_eq!(data.scratch().used(), 0);

        let warned = data.warning(Warning::ArenaFull).count > 0;
        if warned {
            prop_assert_eq!(data.nisland(), 0);
            prop_assert_eq!(data.efc().nefc(), 0);
            prop_assert!(data.contacts().is_empty());
            prop_assert!(data.island_arrays().is_none());
            prop_assert_eq!(data.arena().used(), 0);
        } else if data.efc().nefc() > 0 {
            prop_assert_eq!(check_island_invariants(&s.model, &data), Ok(()));
            prop_assert!(data.arena().used() <= slots);
        }
    }
}
