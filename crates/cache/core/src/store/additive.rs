use std::collections::{BTreeMap, BTreeSet};

use super::{AspectStore, log_stale_removal};
use crate::aspect::AspectKind;
use crate::key::CombinedKey;
use crate::resolver::resolve_additive;
use crate::values::StatusId;

pub type StatusStore = AdditiveStore<StatusId>;

/// Store for aspects where every contribution is in effect at once.
///
/// The resolved view is the union of all contributed identities; two keys
/// contributing the same identity simply overlap.
#[derive(Clone, Debug)]
pub struct AdditiveStore<V> {
    kind: AspectKind,
    entries: BTreeMap<CombinedKey, BTreeSet<V>>,
}

impl<V: Ord + Clone> AdditiveStore<V> {
    pub fn new(kind: AspectKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    pub fn is_active(&self, value: &V) -> bool {
        self.entries.values().any(|set| set.contains(value))
    }
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new(AspectKind::Status)
    }
}

impl<V> AspectStore for AdditiveStore<V>
where
    V: Ord + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    type Contribution = BTreeSet<V>;
    type View = BTreeSet<V>;

    fn kind(&self) -> AspectKind {
        self.kind
    }

    /// Returns whether any contributed identity was not already active.
    fn try_add(&mut self, key: CombinedKey, contribution: Self::Contribution) -> bool {
        if contribution.is_empty() {
            self.entries.remove(&key);
            return false;
        }
        let adds_new = contribution.iter().any(|value| !self.is_active(value));
        self.entries.insert(key, contribution);
        adds_new
    }

    fn try_remove(&mut self, key: &CombinedKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if !removed {
            log_stale_removal(self.kind, key);
        }
        removed
    }

    fn view(&self) -> Self::View {
        resolve_additive(self.entries.values())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Tier;

    #[test]
    fn test_different_tiers_do_not_conflict() {
        let mut store = StatusStore::default();
        store.try_add(
            CombinedKey::new(Tier::Gag, 0, "owner", "Gag"),
            BTreeSet::from([StatusId(10)]),
        );
        store.try_add(
            CombinedKey::new(Tier::RestraintSet, 0, "owner", "Set"),
            BTreeSet::from([StatusId(20)]),
        );
        assert_eq!(store.view(), BTreeSet::from([StatusId(10), StatusId(20)]));
    }

    #[test]
    fn test_shared_identity_survives_one_removal() {
        let mut store = StatusStore::default();
        let gag = CombinedKey::new(Tier::Gag, 0, "owner", "Gag");
        let cuffs = CombinedKey::new(Tier::Restriction, 0, "owner", "Cuffs");
        assert!(store.try_add(gag.clone(), BTreeSet::from([StatusId(1)])));
        assert!(!store.try_add(cuffs, BTreeSet::from([StatusId(1)])));

        store.try_remove(&gag);
        assert!(store.is_active(&StatusId(1)));
    }

    #[test]
    fn test_repeat_add_reports_nothing_new() {
        let mut store = StatusStore::default();
        let gag = CombinedKey::new(Tier::Gag, 1, "owner", "Gag");
        assert!(store.try_add(gag.clone(), BTreeSet::from([StatusId(3)])));
        assert!(!store.try_add(gag, BTreeSet::from([StatusId(3)])));
        assert_eq!(store.view().len(), 1);
    }

    #[test]
    fn test_readd_with_extra_identity_reports_new() {
        let mut store = StatusStore::default();
        let gag = CombinedKey::new(Tier::Gag, 1, "owner", "Gag");
        store.try_add(gag.clone(), BTreeSet::from([StatusId(3)]));
        let widened = BTreeSet::from([StatusId(3), StatusId(4)]);
        assert!(store.try_add(gag, widened.clone()));
        assert_eq!(store.view(), widened);
    }
}
