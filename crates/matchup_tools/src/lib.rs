//! # Matchup Tools
//!
//! Everything the `matchup` command line needs around the pure core:
//! - Catalog and army config file loading
//! - Army flag resolution
//! - Text and JSON result sinks
//! - Catalog validation and listing

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod listing;
pub mod loader;
pub mod selection;
pub mod sinks;
pub mod validate;
