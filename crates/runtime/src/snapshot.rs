//! Authoritative server view of which sources are active.
use serde::{Deserialize, Serialize};

use cache_core::{ItemId, Layer};

/// One active source as reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub layer: Layer,
    pub item: ItemId,
    pub enabler: String,
}

impl SnapshotEntry {
    pub fn new(layer: Layer, item: impl Into<String>, enabler: impl Into<String>) -> Self {
        Self {
            layer,
            item: ItemId::new(item),
            enabler: enabler.into(),
        }
    }
}

/// Active sources grouped by tier.
///
/// Absence of an entry means no source of that tier and layer is active.
/// Restraint entries use layer `0` for the base set and `n` for sub-layer
/// `n - 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSnapshot {
    pub gags: Vec<SnapshotEntry>,
    pub restrictions: Vec<SnapshotEntry>,
    pub restraints: Vec<SnapshotEntry>,
}

impl CacheSnapshot {
    pub fn is_empty(&self) -> bool {
        self.gags.is_empty() && self.restrictions.is_empty() && self.restraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.gags.len() + self.restrictions.len() + self.restraints.len()
    }
}
