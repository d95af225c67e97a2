//! Catalog file validation.

use std::path::Path;

use matchup_core::catalog::CatalogIssue;
use matchup_core::error::Result;

use crate::loader::load_catalog;

/// Load a catalog file and check it for unusable entries.
///
/// An empty list means the catalog is clean.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn validate_catalog_file(path: &Path) -> Result<Vec<CatalogIssue>> {
    let catalog = load_catalog(path)?;
    let issues = catalog.validate();
    for issue in &issues {
        tracing::warn!(unit = %issue.unit, "{}", issue.message);
    }
    Ok(issues)
}
