//! Flat-armor damage model.
//!
//! Each weapon hit deals its attack plus any bonus damage keyed on the
//! defender's tags, minus the defender armor matching the weapon type, with
//! a floor of [`MIN_DAMAGE`]. A dual-weapon unit deals the sum of both
//! weapons' hits, each floored on its own.

use std::collections::{BTreeMap, BTreeSet};

use crate::army::ArmyConfig;
use crate::buffs::EffectiveStats;
use crate::data::WeaponType;

/// Minimum damage floor - every weapon hit deals at least 1 damage.
pub const MIN_DAMAGE: f64 = 1.0;

/// Armor of `defender` that mitigates a weapon of `weapon_type`.
#[must_use]
pub fn armor_against(weapon_type: WeaponType, defender: &EffectiveStats) -> f64 {
    match weapon_type {
        WeaponType::Ranged => defender.ranged_armor,
        WeaponType::Melee => defender.melee_armor,
    }
}

/// Total bonus damage `bonus` grants against a defender carrying `tags`.
#[must_use]
pub fn bonus_damage(bonus: &BTreeMap<String, f64>, tags: &BTreeSet<String>) -> f64 {
    tags.iter().filter_map(|tag| bonus.get(tag)).sum()
}

/// Damage of a single weapon hit.
///
/// Formula:
/// ```text
/// Raw Damage   = Attack + Σ Bonus[tag] for each defender tag
/// Final Damage = max(1, Raw Damage - Armor[weapon type])
/// ```
#[must_use]
pub fn weapon_damage(
    attack: f64,
    bonus: &BTreeMap<String, f64>,
    weapon_type: WeaponType,
    defender_tags: &BTreeSet<String>,
    defender: &EffectiveStats,
) -> f64 {
    let raw = attack + bonus_damage(bonus, defender_tags);
    let armor = armor_against(weapon_type, defender);
    (raw - armor).max(MIN_DAMAGE)
}

/// Damage one attacking unit deals per attack.
///
/// The primary weapon uses the attacker's buffed attack and base bonus
/// table. In dual mode the secondary weapon adds its own hit, computed from
/// its catalog attack, bonus table and weapon type.
#[must_use]
pub fn attack_damage(
    attacker: &ArmyConfig,
    attacker_stats: &EffectiveStats,
    defender: &ArmyConfig,
    defender_stats: &EffectiveStats,
) -> f64 {
    let primary = weapon_damage(
        attacker_stats.attack,
        &attacker.stats.bonus,
        attacker.weapon_type,
        &defender.tags,
        defender_stats,
    );

    let secondary = attacker.armament.secondary().map_or(0.0, |weapon| {
        weapon_damage(
            weapon.stats.attack,
            &weapon.stats.bonus,
            weapon.weapon_type,
            &defender.tags,
            defender_stats,
        )
    });

    primary + secondary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::{BaseStats, WeaponSnapshot};
    use crate::buffs::{BuffConfig, BuffTerm};
    use crate::data::WeaponStats;

    fn defender_stats(melee: f64, ranged: f64) -> EffectiveStats {
        EffectiveStats {
            hp: 50.0,
            attack: 0.0,
            attack_speed: 1.0,
            melee_armor: melee,
            ranged_armor: ranged,
        }
    }

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_bonus_damage_against_tag() {
        let mut bonus = BTreeMap::new();
        bonus.insert("Cavalry".to_string(), 20.0);

        let damage = weapon_damage(
            5.0,
            &bonus,
            WeaponType::Melee,
            &tags(&["Cavalry"]),
            &defender_stats(2.0, 0.0),
        );
        assert_eq!(damage, 23.0);

        let no_tag = weapon_damage(
            5.0,
            &bonus,
            WeaponType::Melee,
            &tags(&["Infantry"]),
            &defender_stats(2.0, 0.0),
        );
        assert_eq!(no_tag, 3.0);
    }

    #[test]
    fn test_bonuses_stack_across_tags() {
        let mut bonus = BTreeMap::new();
        bonus.insert("Cavalry".to_string(), 10.0);
        bonus.insert("Heavy".to_string(), 4.0);
        assert_eq!(bonus_damage(&bonus, &tags(&["Cavalry", "Heavy", "Melee"])), 14.0);
    }

    #[test]
    fn test_armor_selected_by_weapon_type() {
        let defender = defender_stats(1.0, 6.0);
        let none = BTreeMap::new();
        let empty = BTreeSet::new();
        assert_eq!(
            weapon_damage(10.0, &none, WeaponType::Melee, &empty, &defender),
            9.0
        );
        assert_eq!(
            weapon_damage(10.0, &none, WeaponType::Ranged, &empty, &defender),
            4.0
        );
    }

    #[test]
    fn test_minimum_damage_floor() {
        let damage = weapon_damage(
            3.0,
            &BTreeMap::new(),
            WeaponType::Melee,
            &BTreeSet::new(),
            &defender_stats(10.0, 0.0),
        );
        assert_eq!(damage, MIN_DAMAGE);
    }

    #[test]
    fn test_zeroed_attacker_deals_floor() {
        let attacker = ArmyConfig::default();
        let defender = ArmyConfig::default();
        let damage = attack_damage(
            &attacker,
            &attacker.effective_stats(0.0),
            &defender,
            &defender.effective_stats(0.0),
        );
        assert_eq!(damage, MIN_DAMAGE);
    }

    #[test]
    fn test_dual_weapon_sums_independent_hits() {
        let attacker = ArmyConfig::new("Lancer", 1, BaseStats::new(100.0, 12.0, 1.0))
            .with_secondary(WeaponSnapshot {
                weapon_type: WeaponType::Ranged,
                attack_speed: 3.0,
                stats: WeaponStats {
                    attack: 6.0,
                    ..Default::default()
                },
            });
        let defender = ArmyConfig::new("Target", 1, BaseStats::new(100.0, 0.0, 1.0).with_armor(2.0, 1.0));

        // Primary: 12 - 2 melee armor = 10; secondary: 6 - 1 ranged armor = 5
        let damage = attack_damage(
            &attacker,
            &attacker.effective_stats(0.0),
            &defender,
            &defender.effective_stats(0.0),
        );
        assert_eq!(damage, 15.0);
    }

    #[test]
    fn test_dual_weapon_floors_each_hit() {
        let attacker = ArmyConfig::new("Lancer", 1, BaseStats::new(100.0, 1.0, 1.0))
            .with_secondary(WeaponSnapshot {
                weapon_type: WeaponType::Melee,
                attack_speed: 1.0,
                stats: WeaponStats::default(),
            });
        let defender = ArmyConfig::new("Wall", 1, BaseStats::new(100.0, 0.0, 1.0).with_armor(20.0, 20.0));

        let damage = attack_damage(
            &attacker,
            &attacker.effective_stats(0.0),
            &defender,
            &defender.effective_stats(0.0),
        );
        assert_eq!(damage, 2.0 * MIN_DAMAGE);
    }

    #[test]
    fn test_buffs_affect_primary_only() {
        let attacker = ArmyConfig::new("Lancer", 1, BaseStats::new(100.0, 10.0, 1.0))
            .with_buffs(BuffConfig {
                attack_flat: BuffTerm::permanent(5.0),
                ..Default::default()
            })
            .with_secondary(WeaponSnapshot {
                weapon_type: WeaponType::Melee,
                attack_speed: 1.0,
                stats: WeaponStats {
                    attack: 4.0,
                    ..Default::default()
                },
            });
        let defender = ArmyConfig::new("Target", 1, BaseStats::new(100.0, 0.0, 1.0));

        let damage = attack_damage(
            &attacker,
            &attacker.effective_stats(0.0),
            &defender,
            &defender.effective_stats(0.0),
        );
        assert_eq!(damage, 19.0);
    }
}
