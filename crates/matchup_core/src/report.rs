//! Result sink interface and display formatting.
//!
//! The core does not print anything. Front ends implement [`ResultSink`]
//! and usually render an [`OutcomeSummary`], which holds the outcome's
//! fields already rounded the way they are shown to players.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::outcome::{BattleOutcome, EndCause, Winner};

/// Destination for finished battle outcomes.
pub trait ResultSink {
    /// Display or store `outcome`.
    fn present(&mut self, outcome: &BattleOutcome) -> Result<()>;
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn present(&mut self, outcome: &BattleOutcome) -> Result<()> {
        (**self).present(outcome)
    }
}

/// Display-ready rendering of a [`BattleOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    /// Headline, e.g. `Team A Wins! (Knight)` or `Draw!`.
    pub headline: String,
    /// Winner's surviving units.
    pub remaining_units: String,
    /// Winner's remaining HP, one decimal, e.g. `62.5%`.
    pub remaining_hp: String,
    /// Resources lost, rounded to an integer.
    pub resources_lost: String,
    /// Elapsed time, one decimal, e.g. `14.0s`.
    pub duration: String,
    /// Final counts of both sides with unit names.
    pub final_counts: String,
}

impl OutcomeSummary {
    /// Format `outcome` for display.
    #[must_use]
    pub fn from_outcome(outcome: &BattleOutcome) -> Self {
        let headline = match (outcome.winner, outcome.winning_side()) {
            (Winner::A, Some(side)) => format!("Team A Wins! ({})", side.name),
            (Winner::B, Some(side)) => format!("Team B Wins! ({})", side.name),
            _ if outcome.cause == EndCause::Timeout => "Draw! (time limit reached)".to_string(),
            _ => "Draw!".to_string(),
        };

        Self {
            headline,
            remaining_units: outcome.surviving_units.to_string(),
            remaining_hp: format!("{:.1}%", outcome.remaining_hp_pct),
            resources_lost: format!("{:.0}", outcome.resources_lost),
            duration: format!("{:.1}s", outcome.elapsed_time),
            final_counts: format!(
                "Team A ({}): {} units | Team B ({}): {} units",
                outcome.side_a.name,
                outcome.final_count_a,
                outcome.side_b.name,
                outcome.final_count_b
            ),
        }
    }
}

impl std::fmt::Display for OutcomeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.headline)?;
        writeln!(f, "Remaining units: {}", self.remaining_units)?;
        writeln!(f, "Remaining HP:    {}", self.remaining_hp)?;
        writeln!(f, "Resources lost:  {}", self.resources_lost)?;
        writeln!(f, "Battle duration: {}", self.duration)?;
        write!(f, "Final counts:    {}", self.final_counts)
    }
}
