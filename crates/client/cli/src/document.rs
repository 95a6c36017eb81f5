//! Input document: a catalog plus the snapshot to replay against it.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use runtime::{CacheSnapshot, StaticCatalog};

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    catalog: serde_json::Value,
    #[serde(default)]
    snapshot: CacheSnapshot,
}

/// Parsed input document.
pub struct CacheDocument {
    pub catalog: StaticCatalog,
    pub snapshot: CacheSnapshot,
}

impl CacheDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(json).context("Invalid document JSON")?;
        let catalog = if raw.catalog.is_null() {
            StaticCatalog::new()
        } else {
            StaticCatalog::from_value(raw.catalog).context("Invalid catalog")?
        };
        Ok(Self {
            catalog,
            snapshot: raw.snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use cache_core::{ItemCatalog, ItemId};

    use super::*;

    const DOCUMENT: &str = r#"{
        "catalog": {
            "gags": [ { "id": "ball", "label": "Ball Gag" } ]
        },
        "snapshot": {
            "gags": [ { "layer": 0, "item": "ball", "enabler": "mistress" } ]
        }
    }"#;

    #[test]
    fn test_parse_document() {
        let document = CacheDocument::parse(DOCUMENT).unwrap();
        assert!(document.catalog.gag(&ItemId::new("ball")).is_some());
        assert_eq!(document.snapshot.gags.len(), 1);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let document = CacheDocument::parse("{}").unwrap();
        assert!(document.snapshot.is_empty());
    }

    #[test]
    fn test_load_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        let err = CacheDocument::load(file.path()).err().unwrap();
        assert!(format!("{err:#}").contains("Failed to parse"));
    }
}
