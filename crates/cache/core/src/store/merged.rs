use std::collections::BTreeMap;

use super::{AspectStore, log_stale_removal};
use crate::aspect::AspectKind;
use crate::key::CombinedKey;
use crate::resolver::{Merge, resolve_merged};
use crate::values::{Intensity, TraitFlags};

pub type TraitStore = MergedStore<TraitFlags>;
pub type IntensityStore = MergedStore<Intensity>;

/// Store for aspects folded into a single value across all contributions.
#[derive(Clone, Debug)]
pub struct MergedStore<V> {
    kind: AspectKind,
    entries: BTreeMap<CombinedKey, V>,
}

impl<V: Merge> MergedStore<V> {
    pub fn new(kind: AspectKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }
}

impl Default for TraitStore {
    fn default() -> Self {
        Self::new(AspectKind::Traits)
    }
}

impl Default for IntensityStore {
    fn default() -> Self {
        Self::new(AspectKind::Intensity)
    }
}

impl<V> AspectStore for MergedStore<V>
where
    V: Merge + Send + Sync + std::fmt::Debug + 'static,
{
    type Contribution = V;
    type View = V;

    fn kind(&self) -> AspectKind {
        self.kind
    }

    /// Re-adding a key replaces its value. Returns whether the merged value
    /// changed.
    fn try_add(&mut self, key: CombinedKey, contribution: V) -> bool {
        let before = self.view();
        if contribution == V::default() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, contribution);
        }
        self.view() != before
    }

    fn try_remove(&mut self, key: &CombinedKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if !removed {
            log_stale_removal(self.kind, key);
        }
        removed
    }

    fn view(&self) -> V {
        resolve_merged(self.entries.values())
    }

    fn contains(&self, key: &CombinedKey) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
