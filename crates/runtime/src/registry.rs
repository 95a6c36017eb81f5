//! Registry of active sources, one per `(Tier, Layer)` slot.
//!
//! The registry remembers which key occupies each slot and which aspects it
//! contributed to, so removals can target exactly those keys and a re-add can
//! be turned into an in-place replacement.
use std::collections::BTreeMap;

use cache_core::{AspectMask, CombinedKey, ItemId, SourceId};

/// A source currently contributing to the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveSource {
    pub key: CombinedKey,
    pub item: ItemId,
    pub aspects: AspectMask,
}

#[derive(Debug, Default)]
pub(crate) struct SourceRegistry {
    active: BTreeMap<SourceId, ActiveSource>,
}

impl SourceRegistry {
    pub(crate) fn get(&self, source: &SourceId) -> Option<&ActiveSource> {
        self.active.get(source)
    }

    /// Records `entry`, returning whatever occupied its slot before.
    pub(crate) fn insert(&mut self, entry: ActiveSource) -> Option<ActiveSource> {
        self.active.insert(entry.key.source(), entry)
    }

    pub(crate) fn remove(&mut self, source: &SourceId) -> Option<ActiveSource> {
        self.active.remove(source)
    }

    pub(crate) fn sources(&self) -> impl Iterator<Item = &SourceId> {
        self.active.keys()
    }

    /// Active sources in priority order, lowest first.
    pub(crate) fn entries(&self) -> impl Iterator<Item = &ActiveSource> {
        self.active.values()
    }

    pub(crate) fn clear(&mut self) {
        self.active.clear();
    }
}
