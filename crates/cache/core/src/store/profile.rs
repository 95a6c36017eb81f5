use std::collections::BTreeMap;

use tracing::trace;

use super::{AspectStore, Stamped, log_stale_removal};
use crate::aspect::AspectKind;
use crate::key::CombinedKey;
use crate::resolver::{Candidate, resolve_profile};
use crate::values::BodyProfile;

/// Store holding body-profile contributions; a single one is active.
#[derive(Clone, Debug, Default)]
pub struct ProfileStore {
    entries: BTreeMap<CombinedKey, Stamped<BodyProfile>>,
    next_seq: u64,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn winner_entry(&self) -> Option<Candidate<'_, BodyProfile>> {
        resolve_profile(self.entries.iter().map(|(key, entry)| Candidate {
            key,
            seq: entry.seq,
            value: &entry.contribution,
        }))
    }

    pub fn winner(&self) -> Option<&CombinedKey> {
        self.winner_entry().map(|winner| winner.key)
    }
}

impl AspectStore for ProfileStore {
    type Contribution = BodyProfile;
    type View = Option<BodyProfile>;

    fn kind(&self) -> AspectKind {
        AspectKind::Profile
    }

    fn try_add(&mut self, key: CombinedKey, contribution: BodyProfile) -> bool {
        let seq = match self.entries.get(&key) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        self.entries.insert(
            key.clone(),
            Stamped {
                seq,
                contribution,
            },
        );
        let wins = self.winner() == Some(&key);
        if !wins {
            trace!(aspect = %AspectKind::Profile, key = %key, "profile shadowed");
        }
        wins
    }

    fn try_remove(&mut self, key: &CombinedKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if !removed {
            log_stale_removal(AspectKind::Profile, key);
        }
        removed
    }

    fn view(&self) -> Option<BodyProfile> {
        self.winner_entry().map(|winner| winner.value.clone())
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
    fn test_explicit_priority_beats_tier() {
        let mut store = ProfileStore::new();
        let set = CombinedKey::new(Tier::RestraintSet, 0, "owner", "Set");
        let gag = CombinedKey::new(Tier::Gag, 0, "owner", "Gag");
        assert!(store.try_add(set.clone(), BodyProfile::new("hogtie", 50)));
        assert!(!store.try_add(gag.clone(), BodyProfile::new("puffy", 5)));
        assert_eq!(store.view().map(|p| p.id.0), Some("hogtie".to_string()));

        store.try_remove(&set);
        assert_eq!(store.winner(), Some(&gag));
        store.try_remove(&gag);
        assert_eq!(store.view(), None);
    }

    #[test]
    fn test_equal_priority_latest_wins() {
        let mut store = ProfileStore::new();
        let first = CombinedKey::new(Tier::Gag, 0, "owner", "A");
        let second = CombinedKey::new(Tier::Restriction, 0, "owner", "B");
        store.try_add(first, BodyProfile::new("a", 1));
        assert!(store.try_add(second.clone(), BodyProfile::new("b", 1)));
        assert_eq!(store.winner(), Some(&second));
    }
}
