//! Unit catalog lookup and cost balancing.
//!
//! The combat core never reads the catalog. It is handed, read-only, to
//! [`ArmyConfig::build`](crate::army::ArmyConfig::build), which snapshots
//! everything a battle needs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::UnitDefinition;
use crate::error::{MatchupError, Result};

/// Lookup service mapping unit names to definitions.
pub trait UnitCatalog {
    /// Definition for `name`, if the catalog has one.
    fn unit(&self, name: &str) -> Option<&UnitDefinition>;

    /// All unit names in a stable order.
    fn unit_names(&self) -> Vec<&str>;

    /// Sum of all resource fields for `name`; 0 for unknown units.
    fn total_cost(&self, name: &str) -> f64 {
        self.unit(name).map_or(0.0, UnitDefinition::total_cost)
    }

    /// Definition for `name`, or [`MatchupError::UnknownUnit`].
    fn require(&self, name: &str) -> Result<&UnitDefinition> {
        self.unit(name)
            .ok_or_else(|| MatchupError::UnknownUnit(name.to_string()))
    }
}

/// In-memory catalog keyed by unit name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Catalog {
    units: BTreeMap<String, UnitDefinition>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog in the JSON layout (`{ "Unit Name": { weapons, tags, costs } }`).
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| MatchupError::CatalogParseError {
            format: "json",
            message: e.to_string(),
        })
    }

    /// Parse a catalog written in RON.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| MatchupError::CatalogParseError {
            format: "ron",
            message: e.to_string(),
        })
    }

    /// Add or replace a unit definition.
    pub fn insert(&mut self, name: impl Into<String>, unit: UnitDefinition) {
        self.units.insert(name.into(), unit);
    }

    /// Number of units in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the catalog holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate units in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UnitDefinition)> {
        self.units.iter().map(|(name, unit)| (name.as_str(), unit))
    }

    /// Check the catalog for entries the calculator cannot use sensibly.
    ///
    /// Returns every problem found; an empty list means the catalog is clean.
    #[must_use]
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for (name, unit) in self.iter() {
            let mut report = |message: String| {
                issues.push(CatalogIssue {
                    unit: name.to_string(),
                    message,
                });
            };

            if unit.weapons.primary.ages.is_empty() {
                report("primary weapon lists no ages".to_string());
            }

            let weapons = std::iter::once(("primary", &unit.weapons.primary))
                .chain(unit.weapons.secondary.iter().map(|w| ("secondary", w)));
            for (slot, weapon) in weapons {
                if weapon.attack_speed.is_some_and(|s| s <= 0.0) {
                    report(format!("{slot} weapon has a non-positive attack speed"));
                }
                for (age, stats) in &weapon.ages {
                    let fields = [
                        ("hp", stats.hp),
                        ("attack", stats.attack),
                        ("meleeArmor", stats.melee_armor),
                        ("rangedArmor", stats.ranged_armor),
                    ];
                    for (field, value) in fields {
                        if !value.is_finite() || value < 0.0 {
                            report(format!("{slot} weapon age {age}: invalid {field} {value}"));
                        }
                    }
                    if stats.attack_speed.is_some_and(|s| s <= 0.0) {
                        report(format!(
                            "{slot} weapon age {age}: non-positive attack speed"
                        ));
                    }
                    if slot == "primary" && stats.hp <= 0.0 {
                        report(format!("primary weapon age {age}: unit has no hit points"));
                    }
                }
            }

            if let Some(secondary) = &unit.weapons.secondary {
                for age in secondary.ages.keys() {
                    if !unit.weapons.primary.has_age(age) {
                        report(format!(
                            "secondary weapon lists age {age} missing from the primary weapon"
                        ));
                    }
                }
            }

            for (resource, amount) in &unit.costs {
                if !amount.is_finite() || *amount < 0.0 {
                    report(format!("invalid {resource} cost {amount}"));
                }
            }
        }

        issues
    }
}

impl UnitCatalog for Catalog {
    fn unit(&self, name: &str) -> Option<&UnitDefinition> {
        self.units.get(name)
    }

    fn unit_names(&self) -> Vec<&str> {
        self.units.keys().map(String::as_str).collect()
    }
}

impl FromIterator<(String, UnitDefinition)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, UnitDefinition)>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}

/// A problem found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    /// Unit the problem belongs to.
    pub unit: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.unit, self.message)
    }
}

/// Costs are scaled by this factor before the integer ratio is reduced, so
/// fractional costs keep two decimals of precision.
const COST_SCALE: f64 = 100.0;

/// Unit counts `(count_a, count_b)` at which both armies cost the same.
///
/// The ratio is reduced by the greatest common divisor, so costs 150 and
/// 100 give `(2, 3)`. Returns `None` when either cost is not positive.
#[must_use]
pub fn balance_counts(cost_a: f64, cost_b: f64) -> Option<(u32, u32)> {
    if !(cost_a > 0.0 && cost_b > 0.0) || !cost_a.is_finite() || !cost_b.is_finite() {
        return None;
    }

    let a = (cost_a * COST_SCALE).round() as u64;
    let b = (cost_b * COST_SCALE).round() as u64;
    if a == 0 || b == 0 {
        return None;
    }

    let divisor = gcd(a, b);
    let count_a = u32::try_from(b / divisor).ok()?;
    let count_b = u32::try_from(a / divisor).ok()?;
    Some((count_a, count_b))
}

/// Cost-matched counts for two catalog units.
#[must_use]
pub fn balance_units(catalog: &impl UnitCatalog, unit_a: &str, unit_b: &str) -> Option<(u32, u32)> {
    balance_counts(catalog.total_cost(unit_a), catalog.total_cost(unit_b))
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
