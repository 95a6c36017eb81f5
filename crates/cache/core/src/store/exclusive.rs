use std::collections::{BTreeMap, BTreeSet};

use tracing::{trace, warn};

use super::{AspectStore, Stamped, log_stale_removal};
use crate::aspect::AspectKind;
use crate::key::CombinedKey;
use crate::resolver::{Candidate, resolve_exclusive};
use crate::values::{
    EquipSlot, GlamourItem, MetaIndex, ModId, ModSettings, OverlayKind, OverlayParams, TriState,
};

pub type EquipmentStore = ExclusiveStore<EquipSlot, GlamourItem>;
pub type MetaStore = ExclusiveStore<MetaIndex, TriState>;
pub type ModStore = ExclusiveStore<ModId, ModSettings>;
pub type OverlayStore = ExclusiveStore<OverlayKind, OverlayParams>;

/// Store for aspects where one contribution owns each sub-resource.
///
/// A key contributes a map of sub-resource to value. Every sub-resource
/// resolves independently to its highest-priority contender.
#[derive(Clone, Debug)]
pub struct ExclusiveStore<S, V> {
    kind: AspectKind,
    entries: BTreeMap<CombinedKey, Stamped<BTreeMap<S, V>>>,
    next_seq: u64,
}

impl<S, V> ExclusiveStore<S, V>
where
    S: Ord + Clone,
    V: Clone + PartialEq,
{
    pub fn new(kind: AspectKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }

    fn candidates(&self, sub: &S) -> Vec<Candidate<'_, V>> {
        self.entries
            .iter()
            .filter_map(|(key, entry)| {
                entry.contribution.get(sub).map(|value| Candidate {
                    key,
                    seq: entry.seq,
                    value,
                })
            })
            .collect()
    }

    /// Current effective value of `sub`.
    pub fn resolve(&self, sub: &S) -> Option<&V> {
        resolve_exclusive(self.candidates(sub)).map(|winner| winner.value)
    }

    /// Key owning `sub`, if any.
    pub fn winner(&self, sub: &S) -> Option<&CombinedKey> {
        resolve_exclusive(self.candidates(sub)).map(|winner| winner.key)
    }

    /// Number of contributions competing for `sub`.
    pub fn contenders(&self, sub: &S) -> usize {
        self.candidates(sub).len()
    }

    fn warn_on_ties(&self, key: &CombinedKey, subs: &BTreeMap<S, V>)
    where
        S: std::fmt::Debug,
    {
        for sub in subs.keys() {
            if let Some(other) = self
                .candidates(sub)
                .into_iter()
                .find(|c| c.key != key && c.key.priority() == key.priority())
            {
                warn!(
                    aspect = %self.kind,
                    sub = ?sub,
                    key = %key,
                    other = %other.key,
                    "two contributions share a priority; latest insertion wins"
                );
            }
        }
    }
}

impl<S, V> AspectStore for ExclusiveStore<S, V>
where
    S: Ord + Clone + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    type Contribution = BTreeMap<S, V>;
    type View = BTreeMap<S, V>;

    fn kind(&self) -> AspectKind {
        self.kind
    }

    fn try_add(&mut self, key: CombinedKey, contribution: Self::Contribution) -> bool {
        if contribution.is_empty() {
            self.try_remove(&key);
            return false;
        }
        self.warn_on_ties(&key, &contribution);

        // Replacing keeps the original sequence: the source changed its
        // definition, it did not re-enter.
        let seq = match self.entries.get(&key) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        let subs: Vec<S> = contribution.keys().cloned().collect();
        self.entries.insert(key.clone(), Stamped { seq, contribution });

        let wins = subs
            .iter()
            .any(|sub| self.winner(sub).is_some_and(|winner| *winner == key));
        if !wins {
            trace!(aspect = %self.kind, key = %key, "contribution shadowed");
        }
        wins
    }

    fn try_remove(&mut self, key: &CombinedKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if !removed {
            log_stale_removal(self.kind, key);
        }
        removed
    }

    fn view(&self) -> Self::View {
        let subs: BTreeSet<&S> = self
            .entries
            .values()
            .flat_map(|entry| entry.contribution.keys())
            .collect();
        subs.into_iter()
            .filter_map(|sub| Some((sub.clone(), self.resolve(sub)?.clone())))
            .collect()
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
