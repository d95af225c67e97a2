//! Unit data structures for data-driven unit definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::weapon_data::{WeaponDefinition, WeaponStats};

/// The weapons a unit carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Weapons {
    /// Main weapon; its ages define which ages the unit exists in.
    #[serde(default)]
    pub primary: WeaponDefinition,

    /// Optional second weapon (not all units or ages have one).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<WeaponDefinition>,
}

/// Data-driven unit definition.
///
/// # Example JSON
///
/// ```json
/// "Horseman": {
///     "weapons": {
///         "primary": {
///             "type": "melee",
///             "attackSpeed": 1.75,
///             "ages": {
///                 "2": { "hp": 125, "attack": 9, "meleeArmor": 0, "rangedArmor": 2,
///                        "bonus": { "Ranged": 9 } }
///             }
///         }
///     },
///     "tags": ["Cavalry", "Light Melee"],
///     "costs": { "food": 100, "wood": 20 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UnitDefinition {
    /// Primary and optional secondary weapon.
    #[serde(default)]
    pub weapons: Weapons,

    /// Tags other units' bonus damage keys on (e.g. "Cavalry").
    #[serde(default)]
    pub tags: Vec<String>,

    /// Resource costs keyed by resource name (food, wood, gold, ...).
    #[serde(default)]
    pub costs: BTreeMap<String, f64>,
}

impl UnitDefinition {
    /// Sum of every listed resource cost.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.costs.values().sum()
    }

    /// Check if this unit has the specified tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Ages in which the unit exists, ascending.
    #[must_use]
    pub fn available_ages(&self) -> Vec<&str> {
        self.weapons.primary.sorted_ages()
    }

    /// Age preselected for this unit: age 3 when available, otherwise the
    /// highest age listed.
    #[must_use]
    pub fn default_age(&self) -> Option<&str> {
        let ages = self.available_ages();
        if ages.contains(&"3") {
            Some("3")
        } else {
            ages.last().copied()
        }
    }

    /// Whether a secondary weapon exists for `age`.
    #[must_use]
    pub fn has_secondary(&self, age: &str) -> bool {
        self.weapons
            .secondary
            .as_ref()
            .is_some_and(|w| w.has_age(age))
    }

    /// Primary weapon stats for `age`.
    #[must_use]
    pub fn primary_stats(&self, age: &str) -> Option<&WeaponStats> {
        self.weapons.primary.stats_for(age)
    }
}
