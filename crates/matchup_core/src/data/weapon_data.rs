//! Weapon data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attack interval used when neither the age entry nor the weapon lists one.
pub const DEFAULT_ATTACK_SPEED: f64 = 1.0;

/// Delivery type of a weapon; selects which armor value mitigates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeaponType {
    /// Mitigated by melee armor.
    #[default]
    Melee,
    /// Mitigated by ranged armor.
    Ranged,
}

impl WeaponType {
    /// Lowercase name as used in catalog files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Melee => "melee",
            Self::Ranged => "ranged",
        }
    }
}

/// Statistics of a weapon (and the unit wielding it) for one age.
///
/// Every field defaults to zero or empty so that partial catalog entries
/// still produce a usable stat block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeaponStats {
    /// Hit points of one unit.
    #[serde(default)]
    pub hp: f64,

    /// Base damage per attack.
    #[serde(default)]
    pub attack: f64,

    /// Armor against melee weapons.
    #[serde(default)]
    pub melee_armor: f64,

    /// Armor against ranged weapons.
    #[serde(default)]
    pub ranged_armor: f64,

    /// Per-age attack interval, overriding the weapon-level value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_speed: Option<f64>,

    /// Extra damage against defenders carrying the keyed tag.
    #[serde(default)]
    pub bonus: BTreeMap<String, f64>,
}

impl WeaponStats {
    /// Bonus damage against a defender carrying `tag`, if any.
    #[must_use]
    pub fn bonus_vs(&self, tag: &str) -> Option<f64> {
        self.bonus.get(tag).copied()
    }
}

/// A weapon and its statistics across ages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeaponDefinition {
    /// Melee or ranged.
    #[serde(rename = "type", default)]
    pub weapon_type: WeaponType,

    /// Seconds between attacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_speed: Option<f64>,

    /// Stats keyed by age identifier (e.g. `"2"`, `"3"`).
    #[serde(default)]
    pub ages: BTreeMap<String, WeaponStats>,
}

impl WeaponDefinition {
    /// Stats for `age`, if this weapon exists in that age.
    #[must_use]
    pub fn stats_for(&self, age: &str) -> Option<&WeaponStats> {
        self.ages.get(age)
    }

    /// Whether the weapon has data for `age`.
    #[must_use]
    pub fn has_age(&self, age: &str) -> bool {
        self.ages.contains_key(age)
    }

    /// Attack interval for `age`: the age entry first, then the weapon,
    /// then [`DEFAULT_ATTACK_SPEED`]. Non-positive values are skipped.
    #[must_use]
    pub fn attack_speed_for(&self, age: &str) -> f64 {
        self.stats_for(age)
            .and_then(|s| s.attack_speed)
            .filter(|s| *s > 0.0)
            .or(self.attack_speed.filter(|s| *s > 0.0))
            .unwrap_or(DEFAULT_ATTACK_SPEED)
    }

    /// Age identifiers in ascending order (numeric ages sort numerically).
    #[must_use]
    pub fn sorted_ages(&self) -> Vec<&str> {
        let mut ages: Vec<&str> = self.ages.keys().map(String::as_str).collect();
        ages.sort_by_key(|age| (age.parse::<u32>().unwrap_or(u32::MAX), age.to_string()));
        ages
    }
}
