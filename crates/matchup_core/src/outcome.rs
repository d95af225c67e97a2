//! Battle outcome resolution.
//!
//! Turns the terminal army states into a winner and resource-efficiency
//! metrics. Surviving strength is measured by the HP pool, not the unit
//! count, so a winner left with many wounded units still shows the damage
//! it took.

use serde::{Deserialize, Serialize};

use crate::simulation::{ArmyState, TickRecord};

/// Who won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    /// Side A has units left and side B does not.
    A,
    /// Side B has units left and side A does not.
    B,
    /// Neither side is alone on the field.
    Draw,
}

/// Why the battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndCause {
    /// One side was wiped out.
    Elimination,
    /// Both sides were wiped out by the same volley.
    MutualElimination,
    /// The time limit was reached.
    Timeout,
}

/// Final standing of one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideReport {
    /// Unit name.
    pub name: String,
    /// Units at the start.
    pub starting_count: u32,
    /// Units at the end.
    pub final_count: u32,
    /// HP pool left as a percentage of the full starting pool, 0 to 100.
    pub remaining_hp_pct: f64,
    /// Cost of the starting army.
    pub starting_cost: f64,
    /// Share of the starting cost that was destroyed.
    pub resources_lost: f64,
}

impl SideReport {
    fn from_state(state: &ArmyState<'_>) -> Self {
        let config = state.config;
        let remaining_hp_pct = remaining_hp_pct(state);
        let starting_cost = config.starting_cost();
        Self {
            name: config.name.clone(),
            starting_count: config.count,
            final_count: state.units_alive,
            remaining_hp_pct,
            starting_cost,
            resources_lost: starting_cost * (1.0 - remaining_hp_pct / 100.0),
        }
    }
}

/// Result of one battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// Winning side or draw.
    pub winner: Winner,
    /// Why the battle ended.
    pub cause: EndCause,
    /// Units the winner has left; 0 on a draw.
    pub surviving_units: u32,
    /// Winner's remaining HP pool in percent of its starting pool; 0 on a draw.
    pub remaining_hp_pct: f64,
    /// Cost-weighted losses of the winner; on a draw, side B's full starting
    /// cost. Per-side losses are in `side_a` and `side_b`.
    pub resources_lost: f64,
    /// Simulated seconds until the last event (never negative).
    pub elapsed_time: f64,
    /// Units left on side A.
    pub final_count_a: u32,
    /// Units left on side B.
    pub final_count_b: u32,
    /// Full report for side A.
    pub side_a: SideReport,
    /// Full report for side B.
    pub side_b: SideReport,
    /// Attack events processed.
    pub events: u64,
    /// Per-event snapshots, when recording was enabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<TickRecord>,
}

impl BattleOutcome {
    /// Report of the winning side, if there is one.
    #[must_use]
    pub fn winning_side(&self) -> Option<&SideReport> {
        match self.winner {
            Winner::A => Some(&self.side_a),
            Winner::B => Some(&self.side_b),
            Winner::Draw => None,
        }
    }

    /// Whether the battle ended in a draw (including timeouts).
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winner == Winner::Draw
    }
}

/// HP pool of `state` as a percentage of its full starting pool.
///
/// 0 when the side has no units left; always within 0 to 100.
#[must_use]
pub fn remaining_hp_pct(state: &ArmyState<'_>) -> f64 {
    if !state.is_alive() {
        return 0.0;
    }
    let full_pool = state.effective.hp * f64::from(state.config.count);
    if full_pool <= 0.0 {
        return 0.0;
    }
    (state.hp_pool / full_pool * 100.0).clamp(0.0, 100.0)
}

/// Determine the winner and efficiency metrics from the terminal states.
#[must_use]
pub fn resolve_outcome(
    a: &ArmyState<'_>,
    b: &ArmyState<'_>,
    elapsed_time: f64,
    timed_out: bool,
    events: u64,
    timeline: Vec<TickRecord>,
) -> BattleOutcome {
    let side_a = SideReport::from_state(a);
    let side_b = SideReport::from_state(b);

    let winner = match (a.is_alive(), b.is_alive()) {
        (true, false) => Winner::A,
        (false, true) => Winner::B,
        _ => Winner::Draw,
    };
    let cause = match winner {
        Winner::A | Winner::B => EndCause::Elimination,
        Winner::Draw if timed_out => EndCause::Timeout,
        Winner::Draw => EndCause::MutualElimination,
    };

    let (surviving_units, remaining_hp_pct, resources_lost) = match winner {
        Winner::A => (side_a.final_count, side_a.remaining_hp_pct, side_a.resources_lost),
        Winner::B => (side_b.final_count, side_b.remaining_hp_pct, side_b.resources_lost),
        Winner::Draw => (0, 0.0, side_b.starting_cost),
    };

    BattleOutcome {
        winner,
        cause,
        surviving_units,
        remaining_hp_pct,
        resources_lost,
        elapsed_time,
        final_count_a: a.units_alive,
        final_count_b: b.units_alive,
        side_a,
        side_b,
        events,
        timeline,
    }
}
