//! Data structures for the unit catalog.
//!
//! This module contains pure data structures that describe units, their
//! weapons and per-age statistics. All structs deserialize from the JSON
//! catalog layout (`units_restructured.json`) and from RON.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `matchup_tools`.

mod unit_data;
mod weapon_data;

pub use unit_data::{UnitDefinition, Weapons};
pub use weapon_data::{WeaponDefinition, WeaponStats, WeaponType, DEFAULT_ATTACK_SPEED};
