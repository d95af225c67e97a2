//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the battle resolver
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! The calculator must give the same answer every time it is asked the
//! same question. Sources of non-determinism include:
//!
//! - **Collection iteration order**: `HashMap`/`HashSet` order is randomized
//!   per process. Tags and bonus tables use `BTreeMap`/`BTreeSet`, so bonus
//!   sums are always added in the same order.
//!
//! - **Evaluation order**: applying one side's volley before computing the
//!   other's lets the side evaluated first win mirror matches. Both volleys
//!   are computed before either lands.
//!
//! - **Floating-point drift**: repeated `time + interval` additions can make
//!   two identical schedules disagree in the last bit. Events within
//!   `EPSILON` are treated as simultaneous.
//!
//! Outcomes are compared through a hash of their JSON form, which covers
//! every field including the recorded timeline.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use matchup_core::army::ArmyConfig;
use matchup_core::outcome::BattleOutcome;
use matchup_core::simulation::{run_battle_with, SimulationConfig};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Outcome hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic resolver).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the battle was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different outcomes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle resolution is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Hash every field of an outcome.
///
/// # Panics
///
/// Panics if the outcome cannot be serialized, which only happens for
/// non-finite numbers.
#[must_use]
pub fn outcome_hash(outcome: &BattleOutcome) -> u64 {
    let json = serde_json::to_string(outcome).expect("outcome serializes");
    compute_hash(&json)
}

/// Resolve the same battle `runs` times and compare the outcomes.
pub fn verify_determinism(
    a: &ArmyConfig,
    b: &ArmyConfig,
    config: &SimulationConfig,
    runs: usize,
) -> DeterminismResult {
    let hashes: Vec<u64> = (0..runs)
        .map(|_| outcome_hash(&run_battle_with(a, b, config)))
        .collect();
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Resolve the same battle on `threads` scoped threads and compare outcomes.
///
/// Each thread owns its own armies and state, so any divergence points at
/// hidden shared state in the resolver.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn verify_parallel_determinism(
    a: &ArmyConfig,
    b: &ArmyConfig,
    config: &SimulationConfig,
    threads: usize,
) -> DeterminismResult {
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let (a, b) = (a.clone(), b.clone());
                s.spawn(move || outcome_hash(&run_battle_with(&a, &b, config)))
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for battle inputs.
///
/// Ranges stay within what real catalogs contain so that most generated
/// battles end by elimination rather than timeout.
pub mod strategies {
    use matchup_core::army::{ArmyConfig, BaseStats, WeaponSnapshot};
    use matchup_core::buffs::{ArmorBuff, BuffConfig, BuffTerm};
    use matchup_core::data::{WeaponStats, WeaponType};
    use proptest::prelude::*;

    /// Tags bonus damage may key on.
    pub const TAGS: [&str; 5] = ["Cavalry", "Infantry", "Ranged", "Light Melee", "Heavy"];

    /// Melee or ranged.
    pub fn arb_weapon_type() -> impl Strategy<Value = WeaponType> {
        prop_oneof![Just(WeaponType::Melee), Just(WeaponType::Ranged)]
    }

    /// A subset of [`TAGS`].
    pub fn arb_tags() -> impl Strategy<Value = Vec<String>> {
        proptest::sample::subsequence(TAGS.to_vec(), 0..=3)
            .prop_map(|tags| tags.into_iter().map(str::to_string).collect())
    }

    /// Hit points: 1 to 500.
    pub fn arb_hp() -> impl Strategy<Value = f64> {
        (1u32..=500).prop_map(f64::from)
    }

    /// Attack: 0 to 40 (zero exercises the damage floor).
    pub fn arb_attack() -> impl Strategy<Value = f64> {
        (0u32..=40).prop_map(f64::from)
    }

    /// Armor: 0 to 12.
    pub fn arb_armor() -> impl Strategy<Value = f64> {
        (0u32..=12).prop_map(f64::from)
    }

    /// Attack interval: 0.5 to 3.0 seconds in eighths.
    pub fn arb_attack_speed() -> impl Strategy<Value = f64> {
        (4u32..=24).prop_map(|eighths| f64::from(eighths) / 8.0)
    }

    /// Base stats with an optional bonus against one tag.
    pub fn arb_base_stats() -> impl Strategy<Value = BaseStats> {
        (
            arb_hp(),
            arb_attack(),
            arb_attack_speed(),
            arb_armor(),
            arb_armor(),
            proptest::option::of((proptest::sample::select(TAGS.to_vec()), 1u32..=25)),
        )
            .prop_map(|(hp, attack, speed, melee, ranged, bonus)| {
                let stats = BaseStats::new(hp, attack, speed).with_armor(melee, ranged);
                match bonus {
                    Some((tag, amount)) => stats.with_bonus(tag, f64::from(amount)),
                    None => stats,
                }
            })
    }

    /// A buff term lasting 0 (permanent) to 60 seconds.
    pub fn arb_buff_term(max_amount: u32) -> impl Strategy<Value = BuffTerm> {
        (0..=max_amount, 0u32..=60)
            .prop_map(|(amount, expiry)| BuffTerm::until(f64::from(amount), f64::from(expiry)))
    }

    /// Any combination of buffs.
    pub fn arb_buffs() -> impl Strategy<Value = BuffConfig> {
        (
            arb_buff_term(10),
            arb_buff_term(50),
            arb_buff_term(50),
            arb_buff_term(50),
            arb_buff_term(50),
            (0u32..=4, 0u32..=4, 0u32..=60),
        )
            .prop_map(
                |(attack_flat, attack_pct, hp_flat, hp_pct, speed_pct, (melee, ranged, expiry))| {
                    BuffConfig {
                        attack_flat,
                        attack_pct,
                        hp_flat,
                        hp_pct,
                        speed_pct,
                        armor: ArmorBuff {
                            melee: f64::from(melee),
                            ranged: f64::from(ranged),
                            expiry: f64::from(expiry),
                        },
                    }
                },
            )
    }

    /// An optional secondary weapon.
    pub fn arb_secondary() -> impl Strategy<Value = Option<WeaponSnapshot>> {
        proptest::option::of((arb_weapon_type(), arb_attack(), arb_attack_speed()).prop_map(
            |(weapon_type, attack, attack_speed)| WeaponSnapshot {
                weapon_type,
                attack_speed,
                stats: WeaponStats {
                    attack,
                    ..Default::default()
                },
            },
        ))
    }

    /// A complete army of 1 to 30 units.
    pub fn arb_army_config() -> impl Strategy<Value = ArmyConfig> {
        (
            1u32..=30,
            arb_base_stats(),
            arb_weapon_type(),
            arb_tags(),
            arb_buffs(),
            proptest::option::of(0u32..=3),
            arb_secondary(),
            1u32..=300,
        )
            .prop_map(
                |(count, stats, weapon_type, tags, buffs, first_strike, secondary, cost)| {
                    let mut army = ArmyConfig::new("Generated", count, stats)
                        .with_weapon_type(weapon_type)
                        .with_tags(tags)
                        .with_buffs(buffs)
                        .with_unit_cost(f64::from(cost));
                    if let Some(hits) = first_strike {
                        army = army.with_first_strike(hits);
                    }
                    if let Some(secondary) = secondary {
                        army = army.with_secondary(secondary);
                    }
                    army
                },
            )
    }
}
