//! Attack scheduler.
//!
//! Discrete-event loop that advances simulated time straight to the next
//! scheduled attack instead of stepping at a fixed rate. Each side's army is
//! one aggregate HP pool; unit counts are derived from the pool after every
//! volley.
//!
//! # Event ordering
//!
//! Attacks scheduled within [`EPSILON`] of the current event time fire
//! together, and both sides' damage is computed before either is applied.
//! Identical armies therefore trade blows in lockstep and always draw;
//! neither side gets a first-mover edge from evaluation order.
//!
//! # Determinism
//!
//! - No randomness
//! - Tags and bonus tables are ordered collections, so floating-point sums
//!   are evaluated in the same order every run
//! - Same inputs always produce the same [`BattleOutcome`]
//!
//! # Example
//!
//! ```
//! use matchup_core::army::{ArmyConfig, BaseStats};
//! use matchup_core::simulation::{Battle, SimulationConfig};
//!
//! let a = ArmyConfig::new("Archer", 4, BaseStats::new(70.0, 6.0, 1.5));
//! let b = ArmyConfig::new("Spearman", 3, BaseStats::new(80.0, 7.0, 1.875));
//!
//! let mut battle = Battle::new(&a, &b, SimulationConfig::default());
//! while !battle.is_finished() {
//!     battle.step();
//! }
//! let outcome = battle.finish();
//! assert!(outcome.elapsed_time <= 300.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::army::ArmyConfig;
use crate::buffs::EffectiveStats;
use crate::combat::attack_damage;
use crate::outcome::{resolve_outcome, BattleOutcome};

/// Simulated seconds after which a battle is called a draw.
pub const MAX_TIME: f64 = 300.0;

/// Attacks scheduled this close together fire simultaneously.
pub const EPSILON: f64 = 1e-4;

/// Tunables for one battle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Timeout in simulated seconds.
    pub max_time: f64,
    /// Simultaneity tolerance in seconds.
    pub epsilon: f64,
    /// Record a [`TickRecord`] after every event.
    pub record_timeline: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_time: MAX_TIME,
            epsilon: EPSILON,
            record_timeline: false,
        }
    }
}

impl SimulationConfig {
    /// Default tunables with the timeline recorder switched on.
    #[must_use]
    pub fn with_timeline() -> Self {
        Self {
            record_timeline: true,
            ..Self::default()
        }
    }
}

/// One side of the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// First army.
    A,
    /// Second army.
    B,
}

/// Scheduler state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Armies seeded, no event processed yet.
    Init,
    /// Both sides still have units.
    Running,
    /// Side B was wiped out.
    AWins,
    /// Side A was wiped out.
    BWins,
    /// Both sides were wiped out by the same volley.
    Draw,
    /// The time limit was reached with both sides alive.
    Timeout,
}

impl BattlePhase {
    /// Whether the battle is over.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::AWins | Self::BWins | Self::Draw | Self::Timeout)
    }
}

/// Live state of one army.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmyState<'a> {
    /// The army's immutable configuration.
    pub config: &'a ArmyConfig,
    /// Units still standing.
    pub units_alive: u32,
    /// Aggregate hit points of all living units.
    pub hp_pool: f64,
    /// Buffed stats at the current event time.
    pub effective: EffectiveStats,
    /// When this side attacks next; negative during first strike.
    pub next_attack_time: f64,
}

impl<'a> ArmyState<'a> {
    /// Seed an army at full strength.
    #[must_use]
    pub fn new(config: &'a ArmyConfig) -> Self {
        let effective = config.effective_stats(0.0);
        Self {
            config,
            units_alive: config.count,
            hp_pool: (f64::from(config.count) * effective.hp).max(0.0),
            effective,
            next_attack_time: config.opening_time(),
        }
    }

    /// Whether any unit is still standing.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.units_alive > 0
    }

    /// Re-resolve buffs at `time`.
    ///
    /// If an HP buff lapsed, the pool shrinks to what the surviving units
    /// can hold.
    fn refresh(&mut self, time: f64) {
        self.effective = self.config.effective_stats(time);
        let capacity = f64::from(self.units_alive) * self.effective.hp.max(0.0);
        if self.hp_pool > capacity {
            self.hp_pool = capacity;
        }
    }

    /// Whether this side's next attack falls on `time`.
    fn fires_at(&self, time: f64, epsilon: f64) -> bool {
        self.is_alive() && self.next_attack_time <= time + epsilon
    }

    /// Subtract `damage` from the pool and drop every unit the pool can no
    /// longer cover.
    ///
    /// `units_lost = floor((hp × units − pool) / hp)`; overkill carries into
    /// the next unit's share of the pool.
    fn take_damage(&mut self, damage: f64) {
        self.hp_pool = (self.hp_pool - damage).max(0.0);

        let hp = self.effective.hp;
        if hp <= 0.0 {
            self.units_alive = 0;
            return;
        }

        let units_lost = ((hp * f64::from(self.units_alive) - self.hp_pool) / hp).floor();
        if units_lost > 0.0 {
            // Float-to-int casts saturate, so huge ratios clamp to u32::MAX
            self.units_alive = self.units_alive.saturating_sub(units_lost as u32);
        }
    }
}

/// Snapshot of both armies after one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Event time.
    pub time: f64,
    /// Units alive on side A.
    pub units_a: u32,
    /// Units alive on side B.
    pub units_b: u32,
    /// HP pool of side A.
    pub hp_pool_a: f64,
    /// HP pool of side B.
    pub hp_pool_b: f64,
    /// Whether side A attacked in this event.
    pub a_fired: bool,
    /// Whether side B attacked in this event.
    pub b_fired: bool,
}

/// A battle in progress.
#[derive(Debug, Clone)]
pub struct Battle<'a> {
    a: ArmyState<'a>,
    b: ArmyState<'a>,
    config: SimulationConfig,
    time: f64,
    phase: BattlePhase,
    events: u64,
    timeline: Vec<TickRecord>,
}

impl<'a> Battle<'a> {
    /// Seed both armies.
    #[must_use]
    pub fn new(a: &'a ArmyConfig, b: &'a ArmyConfig, config: SimulationConfig) -> Self {
        let a = ArmyState::new(a);
        let b = ArmyState::new(b);
        tracing::debug!(
            army_a = %a.config.name,
            count_a = a.units_alive,
            pool_a = a.hp_pool,
            army_b = %b.config.name,
            count_b = b.units_alive,
            pool_b = b.hp_pool,
            "Battle seeded"
        );

        Self {
            a,
            b,
            config,
            time: 0.0,
            phase: BattlePhase::Init,
            events: 0,
            timeline: Vec::new(),
        }
    }

    /// Current scheduler phase.
    #[must_use]
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Whether the battle has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Time of the last processed event.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Live state of `side`.
    #[must_use]
    pub fn army(&self, side: Side) -> &ArmyState<'a> {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    /// Number of events processed so far.
    #[must_use]
    pub fn events(&self) -> u64 {
        self.events
    }

    /// Process the next event and return the resulting phase.
    ///
    /// Does nothing once the battle is over.
    pub fn step(&mut self) -> BattlePhase {
        if self.phase.is_terminal() {
            return self.phase;
        }
        if let Some(phase) = self.elimination_phase() {
            self.phase = phase;
            return phase;
        }
        self.phase = BattlePhase::Running;

        let next_time = self.a.next_attack_time.min(self.b.next_attack_time);
        // An event exactly at the limit still fires; NaN/infinite schedules time out
        if next_time.is_nan() || next_time > self.config.max_time {
            self.time = self.config.max_time;
            self.phase = BattlePhase::Timeout;
            tracing::debug!(time = self.time, events = self.events, "Battle timed out");
            return self.phase;
        }
        self.time = next_time;

        self.a.refresh(self.time);
        self.b.refresh(self.time);

        let a_fires = self.a.fires_at(self.time, self.config.epsilon);
        let b_fires = self.b.fires_at(self.time, self.config.epsilon);

        // Compute both volleys before applying either
        let damage_to_b = a_fires.then(|| {
            attack_damage(self.a.config, &self.a.effective, self.b.config, &self.b.effective)
                * f64::from(self.a.units_alive)
        });
        let damage_to_a = b_fires.then(|| {
            attack_damage(self.b.config, &self.b.effective, self.a.config, &self.a.effective)
                * f64::from(self.b.units_alive)
        });

        if let Some(damage) = damage_to_b {
            self.b.take_damage(damage);
            self.a.next_attack_time = self.time + self.a.effective.attack_speed;
        }
        if let Some(damage) = damage_to_a {
            self.a.take_damage(damage);
            self.b.next_attack_time = self.time + self.b.effective.attack_speed;
        }

        self.events += 1;
        tracing::trace!(
            time = self.time,
            a_fires,
            b_fires,
            units_a = self.a.units_alive,
            units_b = self.b.units_alive,
            pool_a = self.a.hp_pool,
            pool_b = self.b.hp_pool,
            "Attack event"
        );

        if self.config.record_timeline {
            self.timeline.push(TickRecord {
                time: self.time,
                units_a: self.a.units_alive,
                units_b: self.b.units_alive,
                hp_pool_a: self.a.hp_pool,
                hp_pool_b: self.b.hp_pool,
                a_fired: a_fires,
                b_fired: b_fires,
            });
        }

        if let Some(phase) = self.elimination_phase() {
            self.phase = phase;
            tracing::debug!(time = self.time, events = self.events, ?phase, "Battle decided");
        }
        self.phase
    }

    /// Run every remaining event and resolve the outcome.
    #[must_use]
    pub fn run(mut self) -> BattleOutcome {
        while !self.step().is_terminal() {}
        self.finish()
    }

    /// Resolve the outcome from the current state.
    ///
    /// Normally called once the battle is over; on an unfinished battle it
    /// reports the standings so far as a timeout.
    #[must_use]
    pub fn finish(self) -> BattleOutcome {
        let timed_out = !matches!(
            self.phase,
            BattlePhase::AWins | BattlePhase::BWins | BattlePhase::Draw
        );
        resolve_outcome(
            &self.a,
            &self.b,
            self.time.max(0.0),
            timed_out,
            self.events,
            self.timeline,
        )
    }

    fn elimination_phase(&self) -> Option<BattlePhase> {
        match (self.a.is_alive(), self.b.is_alive()) {
            (true, true) => None,
            (true, false) => Some(BattlePhase::AWins),
            (false, true) => Some(BattlePhase::BWins),
            (false, false) => Some(BattlePhase::Draw),
        }
    }
}

/// Resolve a battle between two armies with default tunables.
#[must_use]
pub fn run_battle(a: &ArmyConfig, b: &ArmyConfig) -> BattleOutcome {
    run_battle_with(a, b, &SimulationConfig::default())
}

/// Resolve a battle between two armies.
#[must_use]
pub fn run_battle_with(a: &ArmyConfig, b: &ArmyConfig, config: &SimulationConfig) -> BattleOutcome {
    let outcome = Battle::new(a, b, *config).run();
    tracing::debug!(
        winner = ?outcome.winner,
        cause = ?outcome.cause,
        elapsed = outcome.elapsed_time,
        events = outcome.events,
        "Battle resolved"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::{BaseStats, WeaponSnapshot};
    use crate::buffs::{BuffConfig, BuffTerm};
    use crate::data::{WeaponStats, WeaponType};
    use crate::outcome::{EndCause, Winner};

    fn army(name: &str, count: u32, hp: f64, attack: f64, speed: f64) -> ArmyConfig {
        ArmyConfig::new(name, count, BaseStats::new(hp, attack, speed))
    }

    #[test]
    fn test_symmetric_armies_draw() {
        let a = army("Spearman", 10, 100.0, 10.0, 1.0);
        let b = a.clone();

        let outcome = run_battle_with(&a, &b, &SimulationConfig::with_timeline());
        assert_eq!(outcome.winner, Winner::Draw);
        assert_eq!(outcome.cause, EndCause::MutualElimination);
        assert_eq!(outcome.final_count_a, 0);
        assert_eq!(outcome.final_count_b, 0);
        assert!(outcome.elapsed_time.is_finite());
        for tick in &outcome.timeline {
            assert_eq!(tick.units_a, tick.units_b, "diverged at t={}", tick.time);
            assert_eq!(tick.hp_pool_a, tick.hp_pool_b);
        }
    }

    #[test]
    fn test_symmetric_exchange_timing() {
        // Damage shrinks with the attacker count, so the pools drain
        // slower as units fall; both hit zero on the volley at t=27.
        let a = army("Spearman", 10, 100.0, 10.0, 1.0);
        let outcome = run_battle(&a, &a.clone());
        assert_eq!(outcome.elapsed_time, 27.0);
        assert_eq!(outcome.events, 28);
    }

    #[test]
    fn test_bonus_damage_kills_in_one_hit() {
        let a = ArmyConfig::new(
            "Spearman",
            1,
            BaseStats::new(50.0, 5.0, 1.0).with_bonus("Cavalry", 20.0),
        )
        .with_first_strike(1);
        let b = ArmyConfig::new("Horseman", 1, BaseStats::new(23.0, 5.0, 1.0).with_armor(2.0, 0.0))
            .with_tags(["Cavalry"]);

        let mut battle = Battle::new(&a, &b, SimulationConfig::default());
        let phase = battle.step();
        assert_eq!(phase, BattlePhase::AWins);
        assert_eq!(battle.time(), -1.0);
        assert_eq!(battle.army(Side::B).hp_pool, 0.0);
    }

    #[test]
    fn test_first_strike_lands_before_time_zero() {
        let a = army("Archer", 1, 1000.0, 10.0, 1.0).with_first_strike(2);
        let b = army("Target", 1, 1000.0, 10.0, 1.0);

        let outcome = run_battle_with(&a, &b, &SimulationConfig::with_timeline());
        let opening: Vec<_> = outcome.timeline.iter().take(3).collect();
        assert_eq!(opening[0].time, -2.0);
        assert!(opening[0].a_fired && !opening[0].b_fired);
        assert_eq!(opening[1].time, -1.0);
        assert!(opening[1].a_fired && !opening[1].b_fired);
        assert_eq!(opening[1].hp_pool_b, 980.0);
        assert_eq!(opening[2].time, 0.0);
        assert!(opening[2].a_fired && opening[2].b_fired);
        assert_eq!(outcome.winner, Winner::A);
    }

    #[test]
    fn test_dual_weapon_damage_per_primary_interval() {
        let a = army("Lancer", 1, 10_000.0, 10.0, 2.0).with_secondary(WeaponSnapshot {
            weapon_type: WeaponType::Melee,
            attack_speed: 0.5,
            stats: WeaponStats {
                attack: 5.0,
                ..Default::default()
            },
        });
        let b = army("Dummy", 1, 10_000.0, 1.0, 100.0);

        let mut battle = Battle::new(&a, &b, SimulationConfig::default());
        battle.step();
        assert_eq!(battle.army(Side::B).hp_pool, 9_985.0);
        assert_eq!(battle.army(Side::A).next_attack_time, 2.0);
        battle.step();
        assert_eq!(battle.time(), 2.0);
        assert_eq!(battle.army(Side::B).hp_pool, 9_970.0);
    }

    #[test]
    fn test_pool_floor_drops_multiple_units() {
        let a = army("Big", 1, 1000.0, 250.0, 1.0);
        let b = army("Small", 5, 100.0, 0.0, 10.0);

        let mut battle = Battle::new(&a, &b, SimulationConfig::default());
        battle.step();
        // 500 pool - 250 damage = 250: floor(250 / 100) = 2 lost
        let b_state = battle.army(Side::B);
        assert_eq!(b_state.hp_pool, 250.0);
        assert_eq!(b_state.units_alive, 3);
        battle.step();
        // Pool 0 wipes the remaining three
        assert_eq!(battle.army(Side::B).units_alive, 0);
        assert_eq!(battle.phase(), BattlePhase::AWins);
    }

    #[test]
    fn test_timeout_is_draw_within_limit() {
        let tank = ArmyConfig::new(
            "Wall",
            200,
            BaseStats::new(1_000_000.0, 1.0, 1.0).with_armor(50.0, 50.0),
        );
        let outcome = run_battle(&tank, &tank.clone());
        assert_eq!(outcome.winner, Winner::Draw);
        assert_eq!(outcome.cause, EndCause::Timeout);
        assert_eq!(outcome.elapsed_time, MAX_TIME);
        assert_eq!(outcome.final_count_a, 200);
        assert_eq!(outcome.remaining_hp_pct, 0.0);
    }

    #[test]
    fn test_custom_time_limit() {
        let tank = army("Wall", 10, 1_000_000.0, 1.0, 1.0);
        let config = SimulationConfig {
            max_time: 20.0,
            ..SimulationConfig::default()
        };
        let outcome = run_battle_with(&tank, &tank.clone(), &config);
        assert_eq!(outcome.cause, EndCause::Timeout);
        assert_eq!(outcome.elapsed_time, 20.0);
        // Attacks at 0..=20
        assert_eq!(outcome.events, 21);
    }

    #[test]
    fn test_kill_exactly_at_time_limit_counts() {
        // 301 hits at t=0..=300; the last one lands on the limit itself
        let a = army("Chipper", 1, 1_000.0, 1.0, 1.0);
        let b = army("Post", 1, 301.0, 0.0, 1_000.0);

        let outcome = run_battle(&a, &b);
        assert_eq!(outcome.winner, Winner::A);
        assert_eq!(outcome.cause, EndCause::Elimination);
        assert_eq!(outcome.elapsed_time, MAX_TIME);
        assert_eq!(outcome.events, 301);
        assert_eq!(outcome.final_count_b, 0);
    }

    #[test]
    fn test_nothing_fires_past_time_limit() {
        let a = army("Chipper", 1, 1_000.0, 1.0, 1.0);
        let b = army("Post", 1, 302.0, 0.0, 1_000.0);

        let outcome = run_battle(&a, &b);
        assert_eq!(outcome.cause, EndCause::Timeout);
        assert_eq!(outcome.elapsed_time, MAX_TIME);
        assert_eq!(outcome.events, 301);
        assert_eq!(outcome.final_count_b, 1);
    }

    #[test]
    fn test_hp_buff_expiry_shrinks_pool() {
        let buffed = army("Guard", 2, 100.0, 1.0, 1.0).with_buffs(BuffConfig {
            hp_flat: BuffTerm::until(100.0, 3.0),
            ..Default::default()
        });
        let b = army("Poker", 1, 1_000.0, 1.0, 1.0);

        let mut battle = Battle::new(&buffed, &b, SimulationConfig::default());
        for _ in 0..4 {
            battle.step();
        }
        // t=3: buff gone, pool capped at 2 × 100
        let state = battle.army(Side::A);
        assert_eq!(battle.time(), 3.0);
        assert_eq!(state.units_alive, 2);
        assert!(state.hp_pool <= 200.0);
    }

    #[test]
    fn test_zero_hp_side_dies_on_first_hit() {
        let ghost = ArmyConfig::default();
        let b = army("Spearman", 1, 100.0, 1.0, 1.0);
        let outcome = run_battle(&ghost, &b);
        assert_eq!(outcome.winner, Winner::B);
        assert_eq!(outcome.final_count_a, 0);
    }

    #[test]
    fn test_infinite_interval_times_out() {
        let frozen = army("Frozen", 1, 100.0, 1.0, 1.0).with_buffs(BuffConfig {
            speed_pct: BuffTerm::permanent(-100.0),
            ..Default::default()
        });
        let outcome = run_battle(&frozen, &frozen.clone());
        // Both sides fire once at t=0, then never again
        assert_eq!(outcome.cause, EndCause::Timeout);
        assert_eq!(outcome.events, 1);
        assert!(outcome.elapsed_time <= MAX_TIME);
    }

    #[test]
    fn test_step_after_finish_is_noop() {
        let a = army("Big", 1, 1000.0, 500.0, 1.0);
        let b = army("Small", 1, 100.0, 1.0, 1.0);
        let mut battle = Battle::new(&a, &b, SimulationConfig::default());
        assert_eq!(battle.step(), BattlePhase::AWins);
        assert_eq!(battle.step(), BattlePhase::AWins);
        assert_eq!(battle.events(), 1);
    }
}
