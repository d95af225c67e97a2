//! Time-bounded buff resolution.
//!
//! Buffs are flat or percentage modifiers with an expiry in simulated
//! seconds. An expiry of `0` means the buff never lapses. Resolution is a
//! pure function of the base stats and the current time, so the scheduler
//! simply calls it again at every event.

use serde::{Deserialize, Serialize};

use crate::army::BaseStats;

/// One buff term: an amount and the time it stops applying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BuffTerm {
    /// Flat amount, or percentage points for percentage terms.
    #[serde(default)]
    pub amount: f64,
    /// Simulated second at which the term lapses; `0` = permanent.
    #[serde(default)]
    pub expiry: f64,
}

impl BuffTerm {
    /// A term that never lapses.
    #[must_use]
    pub const fn permanent(amount: f64) -> Self {
        Self {
            amount,
            expiry: 0.0,
        }
    }

    /// A term that applies while `time < expiry`.
    #[must_use]
    pub const fn until(amount: f64, expiry: f64) -> Self {
        Self { amount, expiry }
    }

    /// Whether the term applies at `time`.
    #[must_use]
    pub fn is_active(&self, time: f64) -> bool {
        self.expiry == 0.0 || time < self.expiry
    }

    /// Multiplier `1 + amount/100` while active, else 1.
    #[must_use]
    fn multiplier_at(&self, time: f64) -> f64 {
        if self.is_active(time) {
            1.0 + self.amount / 100.0
        } else {
            1.0
        }
    }

    /// Amount while active, else 0.
    #[must_use]
    fn flat_at(&self, time: f64) -> f64 {
        if self.is_active(time) {
            self.amount
        } else {
            0.0
        }
    }
}

/// Flat armor bonus; melee and ranged share a single expiry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ArmorBuff {
    /// Added to melee armor.
    #[serde(default)]
    pub melee: f64,
    /// Added to ranged armor.
    #[serde(default)]
    pub ranged: f64,
    /// Simulated second at which both bonuses lapse; `0` = permanent.
    #[serde(default)]
    pub expiry: f64,
}

impl ArmorBuff {
    /// Whether the bonus applies at `time`.
    #[must_use]
    pub fn is_active(&self, time: f64) -> bool {
        self.expiry == 0.0 || time < self.expiry
    }
}

/// All buffs configured for one army.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BuffConfig {
    /// Flat attack bonus.
    pub attack_flat: BuffTerm,
    /// Attack bonus in percent.
    pub attack_pct: BuffTerm,
    /// Flat hit point bonus.
    pub hp_flat: BuffTerm,
    /// Hit point bonus in percent.
    pub hp_pct: BuffTerm,
    /// Attack speed bonus in percent; higher means shorter intervals.
    pub speed_pct: BuffTerm,
    /// Flat armor bonus.
    pub armor: ArmorBuff,
}

impl BuffConfig {
    /// No buffs at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Stats after applying every buff still active at `time`.
    ///
    /// HP and attack use `(base + flat) * (1 + pct/100)` with the flat and
    /// percentage parts gated separately. Attack speed is divided by
    /// `1 + pct/100`.
    #[must_use]
    pub fn resolve(&self, base: &BaseStats, time: f64) -> EffectiveStats {
        let hp = (base.hp + self.hp_flat.flat_at(time)) * self.hp_pct.multiplier_at(time);
        let attack =
            (base.attack + self.attack_flat.flat_at(time)) * self.attack_pct.multiplier_at(time);
        let attack_speed = base.attack_speed / self.speed_pct.multiplier_at(time);

        let (melee_armor, ranged_armor) = if self.armor.is_active(time) {
            (
                base.melee_armor + self.armor.melee,
                base.ranged_armor + self.armor.ranged,
            )
        } else {
            (base.melee_armor, base.ranged_armor)
        };

        EffectiveStats {
            hp,
            attack,
            attack_speed,
            melee_armor,
            ranged_armor,
        }
    }
}

/// Stats of one unit at a given instant, after buffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EffectiveStats {
    /// Hit points of one unit.
    pub hp: f64,
    /// Primary weapon damage before bonuses and armor.
    pub attack: f64,
    /// Seconds between attacks.
    pub attack_speed: f64,
    /// Armor against melee weapons.
    pub melee_armor: f64,
    /// Armor against ranged weapons.
    pub ranged_armor: f64,
}
