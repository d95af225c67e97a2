//! Test fixtures and helpers.
//!
//! A small catalog in the JSON layout plus shortcuts for hand-built armies,
//! so tests across crates exercise the same unit data.

use matchup_core::army::{ArmyConfig, BaseStats};
use matchup_core::catalog::Catalog;
use matchup_core::outcome::BattleOutcome;
use matchup_core::report::ResultSink;

/// Sample catalog covering melee, ranged, bonus damage, a secondary weapon
/// that only exists in some ages, and a unit missing early-age data.
pub const SAMPLE_CATALOG_JSON: &str = r#"{
    "Spearman": {
        "weapons": {
            "primary": {
                "type": "melee",
                "attackSpeed": 1.875,
                "ages": {
                    "1": { "hp": 80, "attack": 7, "meleeArmor": 0, "rangedArmor": 0,
                           "bonus": { "Cavalry": 17 } },
                    "2": { "hp": 90, "attack": 8, "meleeArmor": 0, "rangedArmor": 1,
                           "bonus": { "Cavalry": 20 } },
                    "3": { "hp": 100, "attack": 9, "meleeArmor": 1, "rangedArmor": 2,
                           "bonus": { "Cavalry": 23 } }
                }
            }
        },
        "tags": ["Infantry", "Light Melee"],
        "costs": { "food": 60, "wood": 20 }
    },
    "Horseman": {
        "weapons": {
            "primary": {
                "type": "melee",
                "attackSpeed": 1.75,
                "ages": {
                    "2": { "hp": 125, "attack": 9, "meleeArmor": 0, "rangedArmor": 2,
                           "bonus": { "Ranged": 9 } },
                    "3": { "hp": 150, "attack": 11, "meleeArmor": 1, "rangedArmor": 3,
                           "bonus": { "Ranged": 11 } }
                }
            }
        },
        "tags": ["Cavalry", "Light Melee"],
        "costs": { "food": 100, "wood": 20 }
    },
    "Archer": {
        "weapons": {
            "primary": {
                "type": "ranged",
                "attackSpeed": 1.625,
                "ages": {
                    "1": { "hp": 70, "attack": 5, "bonus": { "Light Melee": 3 } },
                    "2": { "hp": 70, "attack": 6, "bonus": { "Light Melee": 4 } },
                    "3": { "hp": 80, "attack": 7, "meleeArmor": 0, "rangedArmor": 1,
                           "bonus": { "Light Melee": 5 } }
                }
            }
        },
        "tags": ["Infantry", "Ranged"],
        "costs": { "food": 30, "wood": 50 }
    },
    "Camel Archer": {
        "weapons": {
            "primary": {
                "type": "ranged",
                "attackSpeed": 2.0,
                "ages": {
                    "3": { "hp": 160, "attack": 12, "meleeArmor": 1, "rangedArmor": 1 },
                    "4": { "hp": 190, "attack": 14, "meleeArmor": 2, "rangedArmor": 2 }
                }
            },
            "secondary": {
                "type": "melee",
                "attackSpeed": 1.25,
                "ages": {
                    "4": { "attack": 6, "bonus": { "Cavalry": 5 } }
                }
            }
        },
        "tags": ["Cavalry", "Ranged"],
        "costs": { "food": 100, "gold": 80 }
    }
}"#;

/// Parse [`SAMPLE_CATALOG_JSON`].
///
/// # Panics
///
/// Panics if the embedded catalog is malformed.
#[must_use]
pub fn sample_catalog() -> Catalog {
    Catalog::from_json_str(SAMPLE_CATALOG_JSON).expect("sample catalog parses")
}

/// Melee army with no armor, bonuses, buffs or cost.
#[must_use]
pub fn basic_army(name: &str, count: u32, hp: f64, attack: f64, attack_speed: f64) -> ArmyConfig {
    ArmyConfig::new(name, count, BaseStats::new(hp, attack, attack_speed))
}

/// Ten 100 HP, 10 attack, 1 second melee units.
#[must_use]
pub fn reference_army(name: &str) -> ArmyConfig {
    basic_army(name, 10, 100.0, 10.0, 1.0)
}

/// Sink that keeps every outcome it is given.
#[derive(Debug, Default)]
pub struct CollectingSink {
    /// Outcomes in the order they were presented.
    pub outcomes: Vec<BattleOutcome>,
}

impl ResultSink for CollectingSink {
    fn present(&mut self, outcome: &BattleOutcome) -> matchup_core::error::Result<()> {
        self.outcomes.push(outcome.clone());
        Ok(())
    }
}
