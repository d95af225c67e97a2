//! Error types for catalog handling and army building.
//!
//! The combat loop itself has no error paths; everything here happens
//! before a battle starts or after it ends.

use thiserror::Error;

/// Result type alias using [`MatchupError`].
pub type Result<T> = std::result::Result<T, MatchupError>;

/// Top-level error type for the matchup calculator.
#[derive(Debug, Error)]
pub enum MatchupError {
    /// The requested unit is not in the catalog.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// Catalog text could not be parsed.
    #[error("Failed to parse {format} catalog: {message}")]
    CatalogParseError {
        /// Source format ("json" or "ron").
        format: &'static str,
        /// Error message.
        message: String,
    },

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Reading a data file failed.
    #[error("Failed to read '{path}': {message}")]
    IoError {
        /// Path that could not be read.
        path: String,
        /// Error message.
        message: String,
    },

    /// An army selection is incomplete or contradictory.
    #[error("Invalid army selection: {0}")]
    InvalidSelection(String),

    /// A catalog failed validation.
    #[error("Catalog has {0} problem(s)")]
    InvalidCatalog(usize),

    /// A result sink failed to emit an outcome.
    #[error("Failed to write battle outcome: {0}")]
    OutputError(String),
}
