//! Catalog and army config file loading.
//!
//! The core crate never touches the filesystem; everything that reads a
//! file lives here.

use std::fs;
use std::path::Path;

use matchup_core::army::ArmyRequest;
use matchup_core::catalog::Catalog;
use matchup_core::error::{MatchupError, Result};

/// On-disk catalog encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// The web calculator's `units.json` layout.
    Json,
    /// Same structure written as RON.
    Ron,
}

impl CatalogFormat {
    /// Pick the format from the file extension; anything but `.ron` is
    /// treated as JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Self::Ron,
            _ => Self::Json,
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| MatchupError::IoError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load a unit catalog from a JSON or RON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = read(path)?;
    let format = CatalogFormat::from_path(path);
    let parsed = match format {
        CatalogFormat::Json => Catalog::from_json_str(&content),
        CatalogFormat::Ron => Catalog::from_ron_str(&content),
    };

    let catalog = parsed.map_err(|e| MatchupError::DataParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), ?format, units = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

/// Load one side's [`ArmyRequest`] from a RON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_army_request(path: &Path) -> Result<ArmyRequest> {
    let content = read(path)?;
    ron::from_str(&content).map_err(|e| MatchupError::DataParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchup_test_utils::fixtures::SAMPLE_CATALOG_JSON;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(CatalogFormat::from_path(Path::new("units.ron")), CatalogFormat::Ron);
        assert_eq!(CatalogFormat::from_path(Path::new("units.RON")), CatalogFormat::Ron);
        assert_eq!(CatalogFormat::from_path(Path::new("units.json")), CatalogFormat::Json);
        assert_eq!(CatalogFormat::from_path(Path::new("units")), CatalogFormat::Json);
    }

    #[test]
    fn test_load_json_catalog() {
        let file = temp_file(".json", SAMPLE_CATALOG_JSON);
        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_load_ron_catalog() {
        let catalog = Catalog::from_json_str(SAMPLE_CATALOG_JSON).unwrap();
        let file = temp_file(".ron", &ron::to_string(&catalog).unwrap());
        let loaded = load_catalog(file.path()).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, MatchupError::IoError { .. }));
    }

    #[test]
    fn test_load_malformed_catalog() {
        let file = temp_file(".json", "{ not json");
        let err = load_catalog(file.path()).unwrap_err();
        match err {
            MatchupError::DataParseError { path, .. } => {
                assert_eq!(path, file.path().display().to_string());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_army_request() {
        let file = temp_file(
            ".ron",
            r#"(unit: "Spearman", age: Some("2"), count: 15, overrides: (hp: Some(120.0)))"#,
        );
        let request = load_army_request(file.path()).unwrap();
        assert_eq!(request.unit, "Spearman");
        assert_eq!(request.count, 15);
        assert_eq!(request.overrides.hp, Some(120.0));
    }
}
