//! Property tests over generated armies.

use matchup_core::combat::{attack_damage, MIN_DAMAGE};
use matchup_core::outcome::{EndCause, Winner};
use matchup_core::simulation::{run_battle_with, SimulationConfig, MAX_TIME};
use matchup_test_utils::determinism::strategies::arb_army_config;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// An army fighting its own copy never wins.
    #[test]
    fn prop_mirror_match_is_draw(army in arb_army_config()) {
        let outcome = run_battle_with(&army, &army.clone(), &SimulationConfig::with_timeline());

        prop_assert_eq!(outcome.winner, Winner::Draw);
        prop_assert_eq!(outcome.final_count_a, outcome.final_count_b);
        for tick in &outcome.timeline {
            prop_assert_eq!(tick.units_a, tick.units_b);
            prop_assert_eq!(tick.hp_pool_a, tick.hp_pool_b);
        }
    }

    /// Pools and unit counts only ever go down.
    #[test]
    fn prop_attrition_is_monotonic(a in arb_army_config(), b in arb_army_config()) {
        let outcome = run_battle_with(&a, &b, &SimulationConfig::with_timeline());

        for pair in outcome.timeline.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            prop_assert!(after.time >= before.time);
            prop_assert!(after.units_a <= before.units_a);
            prop_assert!(after.units_b <= before.units_b);
            prop_assert!(after.hp_pool_a <= before.hp_pool_a);
            prop_assert!(after.hp_pool_b <= before.hp_pool_b);
            prop_assert!(after.hp_pool_a >= 0.0 && after.hp_pool_b >= 0.0);
        }
    }

    /// Every attack does at least the floor damage, at any point in time.
    #[test]
    fn prop_damage_has_floor(
        a in arb_army_config(),
        b in arb_army_config(),
        time in -10.0f64..120.0,
    ) {
        let damage = attack_damage(&a, &a.effective_stats(time), &b, &b.effective_stats(time));
        prop_assert!(damage >= MIN_DAMAGE);
    }

    /// Reported metrics stay in range and agree with the final counts.
    #[test]
    fn prop_outcome_is_consistent(a in arb_army_config(), b in arb_army_config()) {
        let outcome = run_battle_with(&a, &b, &SimulationConfig::default());

        prop_assert!(outcome.elapsed_time >= 0.0);
        prop_assert!(outcome.elapsed_time <= MAX_TIME);
        prop_assert!((0.0..=100.0).contains(&outcome.remaining_hp_pct));
        prop_assert!(outcome.resources_lost >= 0.0);

        match outcome.winner {
            Winner::A => {
                prop_assert!(outcome.final_count_a > 0);
                prop_assert_eq!(outcome.final_count_b, 0);
                prop_assert_eq!(outcome.surviving_units, outcome.final_count_a);
                prop_assert!(outcome.resources_lost <= a.starting_cost() + 1e-9);
                prop_assert_eq!(outcome.cause, EndCause::Elimination);
            }
            Winner::B => {
                prop_assert_eq!(outcome.final_count_a, 0);
                prop_assert!(outcome.final_count_b > 0);
                prop_assert_eq!(outcome.surviving_units, outcome.final_count_b);
                prop_assert!(outcome.resources_lost <= b.starting_cost() + 1e-9);
                prop_assert_eq!(outcome.cause, EndCause::Elimination);
            }
            Winner::Draw => {
                prop_assert_eq!(outcome.surviving_units, 0);
                prop_assert_eq!(outcome.remaining_hp_pct, 0.0);
                prop_assert_eq!(outcome.resources_lost, b.starting_cost());
                if outcome.cause == EndCause::MutualElimination {
                    prop_assert_eq!(outcome.final_count_a, 0);
                    prop_assert_eq!(outcome.final_count_b, 0);
                }
            }
        }
    }
}
