//! Result sinks writing to any [`std::io::Write`].

use std::io::Write;

use matchup_core::error::{MatchupError, Result};
use matchup_core::outcome::BattleOutcome;
use matchup_core::report::{OutcomeSummary, ResultSink};

fn output_error(e: impl std::fmt::Display) -> MatchupError {
    MatchupError::OutputError(e.to_string())
}

/// Human-readable report, optionally followed by the event timeline.
#[derive(Debug)]
pub struct TextSink<W> {
    writer: W,
    show_timeline: bool,
}

impl<W: Write> TextSink<W> {
    /// Sink printing only the summary.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            show_timeline: false,
        }
    }

    /// Builder method to also print one line per event.
    #[must_use]
    pub fn with_timeline(mut self, show: bool) -> Self {
        self.show_timeline = show;
        self
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for TextSink<W> {
    fn present(&mut self, outcome: &BattleOutcome) -> Result<()> {
        writeln!(self.writer, "{}", OutcomeSummary::from_outcome(outcome)).map_err(output_error)?;

        if self.show_timeline && !outcome.timeline.is_empty() {
            writeln!(self.writer).map_err(output_error)?;
            writeln!(
                self.writer,
                "{:>8}  {:>3} {:>5} {:>10}  {:>3} {:>5} {:>10}",
                "time", "A", "units", "pool", "B", "units", "pool"
            )
            .map_err(output_error)?;
            for tick in &outcome.timeline {
                writeln!(
                    self.writer,
                    "{:>8.3}  {:>3} {:>5} {:>10.1}  {:>3} {:>5} {:>10.1}",
                    tick.time,
                    if tick.a_fired { "*" } else { "" },
                    tick.units_a,
                    tick.hp_pool_a,
                    if tick.b_fired { "*" } else { "" },
                    tick.units_b,
                    tick.hp_pool_b,
                )
                .map_err(output_error)?;
            }
        }
        self.writer.flush().map_err(output_error)
    }
}

/// Pretty-printed JSON, one document per outcome.
#[derive(Debug)]
pub struct JsonSink<W> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    /// Sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for JsonSink<W> {
    fn present(&mut self, outcome: &BattleOutcome) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, outcome).map_err(output_error)?;
        writeln!(self.writer).map_err(output_error)?;
        self.writer.flush().map_err(output_error)
    }
}
