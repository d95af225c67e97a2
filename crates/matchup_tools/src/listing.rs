//! Catalog listing for the `units` command.

use std::fmt::Write;

use matchup_core::catalog::Catalog;
use matchup_core::data::UnitDefinition;

/// One line describing `unit`: ages, weapons, cost and tags.
#[must_use]
pub fn describe_unit(name: &str, unit: &UnitDefinition) -> String {
    let ages = unit.available_ages();
    let mut line = format!(
        "{name}: ages [{}], {}",
        ages.join(", "),
        unit.weapons.primary.weapon_type.as_str()
    );

    if let Some(secondary) = &unit.weapons.secondary {
        let mut secondary_ages = secondary.sorted_ages();
        secondary_ages.retain(|age| ages.contains(age));
        let _ = write!(
            line,
            " + {} (ages {})",
            secondary.weapon_type.as_str(),
            secondary_ages.join(", ")
        );
    }

    let costs: Vec<String> = unit
        .costs
        .iter()
        .map(|(resource, amount)| format!("{amount} {resource}"))
        .collect();
    let _ = write!(line, ", cost {} ({})", unit.total_cost(), costs.join(" + "));

    if !unit.tags.is_empty() {
        let _ = write!(line, ", tags [{}]", unit.tags.join(", "));
    }
    line
}

/// Every unit in name order, one per line.
#[must_use]
pub fn list_units(catalog: &Catalog) -> Vec<String> {
    catalog
        .iter()
        .map(|(name, unit)| describe_unit(name, unit))
        .collect()
}
