//! [`ItemCatalog`] backed by in-memory maps.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use cache_core::{GagItem, ItemCatalog, ItemId, RestraintSet, RestrictionItem};

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: ItemId },
}

/// On-disk layout of a catalog document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogDocument {
    gags: Vec<GagItem>,
    restrictions: Vec<RestrictionItem>,
    restraint_sets: Vec<RestraintSet>,
}

/// ItemCatalog implementation with static item definitions
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    gags: HashMap<ItemId, GagItem>,
    restrictions: HashMap<ItemId, RestrictionItem>,
    restraint_sets: HashMap<ItemId, RestraintSet>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gag definition, replacing any previous one with the same id.
    pub fn add_gag(&mut self, gag: GagItem) {
        self.gags.insert(gag.id.clone(), gag);
    }

    pub fn add_restriction(&mut self, item: RestrictionItem) {
        self.restrictions.insert(item.id.clone(), item);
    }

    pub fn add_restraint_set(&mut self, set: RestraintSet) {
        self.restraint_sets.insert(set.id.clone(), set);
    }

    /// Parses a catalog document. Ids must be unique within each kind.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_value(value)?;
        Self::from_document(document)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            "Loaded catalog from {}: {} gags, {} restrictions, {} restraint sets",
            path.display(),
            catalog.gags.len(),
            catalog.restrictions.len(),
            catalog.restraint_sets.len()
        );
        Ok(catalog)
    }

    fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for gag in document.gags {
            insert_unique(&mut catalog.gags, "gag", gag.id.clone(), gag)?;
        }
        for item in document.restrictions {
            insert_unique(&mut catalog.restrictions, "restriction", item.id.clone(), item)?;
        }
        for set in document.restraint_sets {
            insert_unique(&mut catalog.restraint_sets, "restraint set", set.id.clone(), set)?;
        }
        Ok(catalog)
    }
}

fn insert_unique<T>(
    map: &mut HashMap<ItemId, T>,
    kind: &'static str,
    id: ItemId,
    value: T,
) -> Result<(), CatalogError> {
    if map.contains_key(&id) {
        return Err(CatalogError::DuplicateId { kind, id });
    }
    map.insert(id, value);
    Ok(())
}

impl ItemCatalog for StaticCatalog {
    fn gag(&self, id: &ItemId) -> Option<GagItem> {
        self.gags.get(id).cloned()
    }

    fn restriction(&self, id: &ItemId) -> Option<RestrictionItem> {
        self.restrictions.get(id).cloned()
    }

    fn restraint_set(&self, id: &ItemId) -> Option<RestraintSet> {
        self.restraint_sets.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use cache_core::RestrictionKind;

    const CATALOG: &str = r#"{
        "gags": [
            { "id": "ball", "label": "Ball Gag", "effects": { "intensity": 3 } }
        ],
        "restrictions": [
            {
                "id": "lace",
                "label": "Lace Blindfold",
                "kind": "blindfold",
                "overlay": { "texture": "lace.tex", "opacity": 200 }
            }
        ],
        "restraint_sets": [
            {
                "id": "harness",
                "label": "Harness",
                "layers": [ { "label": "Straps" } ]
            }
        ]
    }"#;

    #[test]
    fn test_from_json_parses_every_kind() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();
        let gag = catalog.gag(&ItemId::new("ball")).unwrap();
        assert_eq!(gag.effects.intensity.0, 3);
        let lace = catalog.restriction(&ItemId::new("lace")).unwrap();
        assert_eq!(lace.kind, RestrictionKind::Blindfold);
        assert!(lace.overlay.is_some());
        let set = catalog.restraint_set(&ItemId::new("harness")).unwrap();
        assert_eq!(set.layers.len(), 1);
        assert!(catalog.gag(&ItemId::new("missing")).is_none());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let json = r#"{
            "gags": [
                { "id": "ball", "label": "A" },
                { "id": "ball", "label": "B" }
            ]
        }"#;
        let err = StaticCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { kind: "gag", .. }));
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        let catalog = StaticCatalog::load(file.path()).unwrap();
        assert!(catalog.restraint_set(&ItemId::new("harness")).is_some());
    }
}
