//! # Matchup Core
//!
//! Deterministic attrition combat resolver for the unit matchup calculator.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO (catalogs are parsed from strings handed in by the caller)
//! - No randomness
//! - Ordered collections everywhere iteration order could leak into results
//!
//! Given two army configurations it predicts the outcome of an unlimited
//! repeated engagement: winner, surviving strength, elapsed time and
//! resource efficiency.
//!
//! ## Crate Structure
//!
//! - [`data`] - Unit catalog data types (weapons, per-age stats, costs)
//! - [`catalog`] - [`catalog::UnitCatalog`] lookup service, in-memory catalog, cost balancing
//! - [`army`] - Army configuration built from the catalog plus user overrides
//! - [`buffs`] - Time-bounded buff resolution
//! - [`combat`] - Per-attack damage model
//! - [`simulation`] - Attack scheduler (the event loop)
//! - [`outcome`] - Winner determination and efficiency metrics
//! - [`report`] - Result sink interface and display formatting
//!
//! ## Example
//!
//! ```
//! use matchup_core::army::{ArmyConfig, BaseStats};
//! use matchup_core::outcome::Winner;
//! use matchup_core::simulation::run_battle;
//!
//! let stats = BaseStats::new(100.0, 10.0, 1.0);
//! let a = ArmyConfig::new("Spearman", 10, stats.clone());
//! let b = ArmyConfig::new("Spearman", 10, stats);
//!
//! let outcome = run_battle(&a, &b);
//! assert_eq!(outcome.winner, Winner::Draw);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod army;
pub mod buffs;
pub mod catalog;
pub mod combat;
pub mod data;
pub mod error;
pub mod outcome;
pub mod report;
pub mod simulation;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::army::{
        Armament, ArmyConfig, ArmyRequest, BaseStats, FirstStrike, StatOverrides, WeaponMode,
        WeaponSnapshot,
    };
    pub use crate::buffs::{ArmorBuff, BuffConfig, BuffTerm, EffectiveStats};
    pub use crate::catalog::{balance_counts, Catalog, UnitCatalog};
    pub use crate::data::{UnitDefinition, WeaponDefinition, WeaponStats, WeaponType};
    pub use crate::error::{MatchupError, Result};
    pub use crate::outcome::{BattleOutcome, EndCause, SideReport, Winner};
    pub use crate::report::{OutcomeSummary, ResultSink};
    pub use crate::simulation::{run_battle, run_battle_with, Battle, SimulationConfig};
}
