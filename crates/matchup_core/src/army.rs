//! Army configuration.
//!
//! An [`ArmyConfig`] is everything one side brings into a battle. It is
//! built once, either from the catalog plus a user [`ArmyRequest`] or
//! directly through the builder methods, and never changes afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::buffs::{BuffConfig, EffectiveStats};
use crate::catalog::UnitCatalog;
use crate::data::{WeaponStats, WeaponType, DEFAULT_ATTACK_SPEED};
use crate::error::Result;

/// Weapon selection as requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeaponMode {
    /// Primary weapon only.
    #[default]
    Primary,
    /// Secondary weapon only.
    Secondary,
    /// Both weapons fire on every attack.
    Both,
}

/// Frozen copy of a secondary weapon for one age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSnapshot {
    /// Melee or ranged; selects the defender's armor.
    pub weapon_type: WeaponType,
    /// The weapon's own interval. Informational: in dual mode the primary
    /// weapon's interval schedules attacks.
    pub attack_speed: f64,
    /// Attack and bonus table for the selected age.
    pub stats: WeaponStats,
}

/// Resolved weapon loadout.
///
/// Resolved once while building the config; the scheduler never looks at
/// the requested [`WeaponMode`] again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Armament {
    /// The base stats describe the primary weapon.
    #[default]
    Primary,
    /// The base stats describe the secondary weapon.
    Secondary,
    /// Primary stats plus a secondary weapon that fires alongside it.
    Both(WeaponSnapshot),
}

impl Armament {
    /// The weapon mode this loadout ended up as.
    #[must_use]
    pub fn mode(&self) -> WeaponMode {
        match self {
            Self::Primary => WeaponMode::Primary,
            Self::Secondary => WeaponMode::Secondary,
            Self::Both(_) => WeaponMode::Both,
        }
    }

    /// The extra weapon firing with every attack, if any.
    #[must_use]
    pub fn secondary(&self) -> Option<&WeaponSnapshot> {
        match self {
            Self::Both(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// Free attacks landed before simulated time zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FirstStrike {
    /// Whether the side gets its free hits.
    pub enabled: bool,
    /// Number of attacks banked before time zero.
    pub free_hits: u32,
}

impl FirstStrike {
    /// First strike with `free_hits` banked attacks.
    #[must_use]
    pub const fn with_hits(free_hits: u32) -> Self {
        Self {
            enabled: true,
            free_hits,
        }
    }

    /// Time of the side's first attack.
    ///
    /// Negative when enabled, so `free_hits` attacks land before the
    /// opponent's first attack at time zero.
    #[must_use]
    pub fn opening_time(&self, attack_speed: f64) -> f64 {
        if self.enabled {
            -f64::from(self.free_hits) * attack_speed
        } else {
            0.0
        }
    }
}

/// Base stats of one unit after manual overrides and before buffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BaseStats {
    /// Hit points of one unit.
    pub hp: f64,
    /// Damage per attack.
    pub attack: f64,
    /// Armor against melee weapons.
    pub melee_armor: f64,
    /// Armor against ranged weapons.
    pub ranged_armor: f64,
    /// Seconds between attacks.
    pub attack_speed: f64,
    /// Extra damage against tagged defenders.
    pub bonus: BTreeMap<String, f64>,
}

impl BaseStats {
    /// Unarmored stats with no bonus damage.
    #[must_use]
    pub fn new(hp: f64, attack: f64, attack_speed: f64) -> Self {
        Self {
            hp,
            attack,
            attack_speed,
            ..Default::default()
        }
    }

    /// Builder method to set both armor values.
    #[must_use]
    pub fn with_armor(mut self, melee: f64, ranged: f64) -> Self {
        self.melee_armor = melee;
        self.ranged_armor = ranged;
        self
    }

    /// Builder method to add bonus damage against `tag`.
    #[must_use]
    pub fn with_bonus(mut self, tag: impl Into<String>, amount: f64) -> Self {
        self.bonus.insert(tag.into(), amount);
        self
    }

    fn from_weapon_stats(stats: &WeaponStats, attack_speed: f64) -> Self {
        Self {
            hp: stats.hp,
            attack: stats.attack,
            melee_armor: stats.melee_armor,
            ranged_armor: stats.ranged_armor,
            attack_speed,
            bonus: stats.bonus.clone(),
        }
    }
}

/// Manual stat edits layered over the catalog values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StatOverrides {
    /// Replacement hit points.
    pub hp: Option<f64>,
    /// Replacement attack.
    pub attack: Option<f64>,
    /// Replacement melee armor.
    pub melee_armor: Option<f64>,
    /// Replacement ranged armor.
    pub ranged_armor: Option<f64>,
    /// Replacement attack interval.
    pub attack_speed: Option<f64>,
}

impl StatOverrides {
    fn apply(&self, stats: &mut BaseStats) {
        if let Some(hp) = self.hp {
            stats.hp = hp;
        }
        if let Some(attack) = self.attack {
            stats.attack = attack;
        }
        if let Some(armor) = self.melee_armor {
            stats.melee_armor = armor;
        }
        if let Some(armor) = self.ranged_armor {
            stats.ranged_armor = armor;
        }
        if let Some(speed) = self.attack_speed.filter(|s| *s > 0.0) {
            stats.attack_speed = speed;
        }
    }
}

/// One side's selections before they are resolved against the catalog.
///
/// # Example RON
///
/// ```ron
/// ArmyRequest(
///     unit: "Spearman",
///     age: Some("3"),
///     count: 12,
///     mode: primary,
///     overrides: (melee_armor: Some(2.0)),
///     buffs: (attack_pct: (amount: 20.0, expiry: 15.0)),
///     first_strike: (enabled: true, free_hits: 1),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmyRequest {
    /// Catalog unit name.
    pub unit: String,
    /// Age to use; `None` picks the unit's default age.
    #[serde(default)]
    pub age: Option<String>,
    /// Starting unit count.
    #[serde(default = "default_count")]
    pub count: u32,
    /// Requested weapon mode.
    #[serde(default)]
    pub mode: WeaponMode,
    /// Manual stat edits.
    #[serde(default)]
    pub overrides: StatOverrides,
    /// Buffs.
    #[serde(default)]
    pub buffs: BuffConfig,
    /// First-strike settings.
    #[serde(default)]
    pub first_strike: FirstStrike,
}

const fn default_count() -> u32 {
    1
}

impl ArmyRequest {
    /// A request for `count` units of `unit` with every other option at its default.
    #[must_use]
    pub fn new(unit: impl Into<String>, count: u32) -> Self {
        Self {
            unit: unit.into(),
            age: None,
            count,
            mode: WeaponMode::Primary,
            overrides: StatOverrides::default(),
            buffs: BuffConfig::default(),
            first_strike: FirstStrike::default(),
        }
    }
}

/// Immutable per-side battle configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmyConfig {
    /// Unit name (for reporting).
    pub name: String,
    /// Age the stats were taken from; empty when built by hand.
    pub age: String,
    /// Starting unit count.
    pub count: u32,
    /// Resolved weapon loadout.
    pub armament: Armament,
    /// Type of the weapon the base stats describe.
    pub weapon_type: WeaponType,
    /// Base stats before buffs.
    pub stats: BaseStats,
    /// Buffs applied over `stats`.
    pub buffs: BuffConfig,
    /// Tags the opponent's bonus damage keys on.
    pub tags: BTreeSet<String>,
    /// First-strike settings.
    pub first_strike: FirstStrike,
    /// Resource cost of one unit.
    pub unit_cost: f64,
}

impl ArmyConfig {
    /// A melee army with no buffs, tags or cost.
    #[must_use]
    pub fn new(name: impl Into<String>, count: u32, stats: BaseStats) -> Self {
        Self {
            name: name.into(),
            age: String::new(),
            count,
            armament: Armament::Primary,
            weapon_type: WeaponType::Melee,
            stats,
            buffs: BuffConfig::default(),
            tags: BTreeSet::new(),
            first_strike: FirstStrike::default(),
            unit_cost: 0.0,
        }
    }

    /// Resolve a request against the catalog.
    ///
    /// Missing data never fails the build: an age without data yields a
    /// zeroed stat block, and a secondary or dual request for a unit without
    /// a secondary weapon in that age falls back to the primary weapon. Only
    /// an unknown unit name is an error.
    pub fn build(catalog: &impl UnitCatalog, request: &ArmyRequest) -> Result<Self> {
        let unit = catalog.require(&request.unit)?;

        let age = request
            .age
            .clone()
            .or_else(|| unit.default_age().map(str::to_string))
            .unwrap_or_default();

        let secondary = unit
            .weapons
            .secondary
            .as_ref()
            .filter(|weapon| weapon.has_age(&age));

        let (weapon, armament) = match (request.mode, secondary) {
            (WeaponMode::Secondary, Some(weapon)) => (weapon, Armament::Secondary),
            (WeaponMode::Both, Some(weapon)) => (
                &unit.weapons.primary,
                Armament::Both(WeaponSnapshot {
                    weapon_type: weapon.weapon_type,
                    attack_speed: weapon.attack_speed_for(&age),
                    stats: weapon.stats_for(&age).cloned().unwrap_or_default(),
                }),
            ),
            (mode, None) if mode != WeaponMode::Primary => {
                tracing::warn!(
                    unit = %request.unit,
                    age = %age,
                    ?mode,
                    "No secondary weapon for this age, using primary"
                );
                (&unit.weapons.primary, Armament::Primary)
            }
            _ => (&unit.weapons.primary, Armament::Primary),
        };

        let age_stats = weapon.stats_for(&age);
        if age_stats.is_none() {
            tracing::warn!(unit = %request.unit, age = %age, "No stats for age, using zeroed stats");
        }
        let mut stats = BaseStats::from_weapon_stats(
            age_stats.unwrap_or(&WeaponStats::default()),
            weapon.attack_speed_for(&age),
        );
        request.overrides.apply(&mut stats);

        Ok(Self {
            name: request.unit.clone(),
            age,
            count: request.count.max(1),
            armament,
            weapon_type: weapon.weapon_type,
            stats,
            buffs: request.buffs,
            tags: unit.tags.iter().cloned().collect(),
            first_strike: request.first_strike,
            unit_cost: catalog.total_cost(&request.unit),
        })
    }

    /// Builder method to set the weapon type of the base stats.
    #[must_use]
    pub fn with_weapon_type(mut self, weapon_type: WeaponType) -> Self {
        self.weapon_type = weapon_type;
        self
    }

    /// Builder method to set tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set buffs.
    #[must_use]
    pub fn with_buffs(mut self, buffs: BuffConfig) -> Self {
        self.buffs = buffs;
        self
    }

    /// Builder method to enable first strike.
    #[must_use]
    pub fn with_first_strike(mut self, free_hits: u32) -> Self {
        self.first_strike = FirstStrike::with_hits(free_hits);
        self
    }

    /// Builder method to add a secondary weapon firing with every attack.
    #[must_use]
    pub fn with_secondary(mut self, secondary: WeaponSnapshot) -> Self {
        self.armament = Armament::Both(secondary);
        self
    }

    /// Builder method to set the cost of one unit.
    #[must_use]
    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    /// Stats at simulated `time` with every active buff applied.
    #[must_use]
    pub fn effective_stats(&self, time: f64) -> EffectiveStats {
        self.buffs.resolve(&self.stats, time)
    }

    /// Whether `tag` is one of this army's tags.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Cost of the whole starting army.
    #[must_use]
    pub fn starting_cost(&self) -> f64 {
        self.unit_cost * f64::from(self.count)
    }

    /// Time of this side's first attack.
    #[must_use]
    pub fn opening_time(&self) -> f64 {
        self.first_strike.opening_time(self.stats.attack_speed)
    }
}

impl Default for ArmyConfig {
    fn default() -> Self {
        Self::new(String::new(), 1, BaseStats::new(0.0, 0.0, DEFAULT_ATTACK_SPEED))
    }
}
