//! Turning command-line army flags into an [`ArmyRequest`].

use std::path::PathBuf;

use matchup_core::army::{ArmyRequest, FirstStrike, WeaponMode};
use matchup_core::error::{MatchupError, Result};

use crate::loader::load_army_request;

/// One side's flags as given on the command line.
///
/// A config file provides the starting request; flags given explicitly
/// override its fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArmySelection {
    /// Catalog unit name.
    pub unit: Option<String>,
    /// Age key.
    pub age: Option<String>,
    /// Starting unit count.
    pub count: Option<u32>,
    /// Weapon mode.
    pub mode: Option<WeaponMode>,
    /// Free first-strike hits; enables first strike.
    pub first_hits: Option<u32>,
    /// RON file holding a full request.
    pub config: Option<PathBuf>,
}

impl ArmySelection {
    /// Resolve the flags into a request.
    ///
    /// `side` only labels error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or no unit was
    /// named at all.
    pub fn into_request(self, side: &str) -> Result<ArmyRequest> {
        let mut request = match (&self.config, self.unit.clone()) {
            (Some(path), _) => load_army_request(path)?,
            (None, Some(unit)) => ArmyRequest::new(unit, 1),
            (None, None) => {
                return Err(MatchupError::InvalidSelection(format!(
                    "army {side} needs a unit name or a config file"
                )))
            }
        };

        if let Some(unit) = self.unit {
            request.unit = unit;
        }
        if let Some(age) = self.age {
            request.age = Some(age);
        }
        if let Some(count) = self.count {
            request.count = count;
        }
        if let Some(mode) = self.mode {
            request.mode = mode;
        }
        if let Some(hits) = self.first_hits {
            request.first_strike = FirstStrike::with_hits(hits);
        }
        Ok(request)
    }
}

/// Scale a cost ratio to whole armies, keeping army A at least `count_a`.
///
/// `ratio` is the reduced `(count_a, count_b)` pair from
/// [`balance_units`](matchup_core::catalog::balance_units).
///
/// # Errors
///
/// Returns an error if the scaled counts do not fit in a `u32`.
pub fn scale_to_ratio(count_a: u32, ratio: (u32, u32)) -> Result<(u32, u32)> {
    let (ratio_a, ratio_b) = (ratio.0.max(1), ratio.1.max(1));
    let groups = count_a.max(1).div_ceil(ratio_a);
    match (ratio_a.checked_mul(groups), ratio_b.checked_mul(groups)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(MatchupError::InvalidSelection(format!(
            "balancing {count_a} units at a {ratio_a}:{ratio_b} cost ratio overflows the unit count"
        ))),
    }
}

/// Parse a weapon mode flag value.
///
/// # Errors
///
/// Returns a message naming the accepted values.
pub fn parse_mode(value: &str) -> std::result::Result<WeaponMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "primary" => Ok(WeaponMode::Primary),
        "secondary" => Ok(WeaponMode::Secondary),
        "both" => Ok(WeaponMode::Both),
        other => Err(format!(
            "unknown weapon mode '{other}' (expected primary, secondary or both)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_only() {
        let selection = ArmySelection {
            unit: Some("Archer".to_string()),
            count: Some(12),
            first_hits: Some(2),
            ..Default::default()
        };
        let request = selection.into_request("A").unwrap();
        assert_eq!(request.unit, "Archer");
        assert_eq!(request.count, 12);
        assert_eq!(request.age, None);
        assert_eq!(request.first_strike, FirstStrike::with_hits(2));
    }

    #[test]
    fn test_missing_unit_is_error() {
        let err = ArmySelection::default().into_request("B").unwrap_err();
        assert!(err.to_string().contains("army B"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        write!(
            file,
            r#"(unit: "Horseman", age: Some("2"), count: 4, mode: secondary,
                buffs: (hp_flat: (amount: 10.0)))"#
        )
        .unwrap();

        let selection = ArmySelection {
            count: Some(9),
            mode: Some(WeaponMode::Primary),
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let request = selection.into_request("A").unwrap();
        assert_eq!(request.unit, "Horseman");
        assert_eq!(request.age.as_deref(), Some("2"));
        assert_eq!(request.count, 9);
        assert_eq!(request.mode, WeaponMode::Primary);
        assert_eq!(request.buffs.hp_flat.amount, 10.0);
    }

    #[test]
    fn test_scale_to_ratio_rounds_up_to_whole_groups() {
        assert_eq!(scale_to_ratio(20, (3, 2)).unwrap(), (21, 14));
        assert_eq!(scale_to_ratio(0, (2, 3)).unwrap(), (2, 3));
        assert_eq!(scale_to_ratio(4, (1, 1)).unwrap(), (4, 4));
    }

    #[test]
    fn test_scale_to_ratio_overflow_is_error() {
        // 1000 against 0.01 reduces to 1 : 100000
        let err = scale_to_ratio(50_000, (1, 100_000)).unwrap_err();
        assert!(matches!(err, MatchupError::InvalidSelection(_)));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("Both"), Ok(WeaponMode::Both));
        assert_eq!(parse_mode("secondary"), Ok(WeaponMode::Secondary));
        assert!(parse_mode("ranged").is_err());
    }
}
