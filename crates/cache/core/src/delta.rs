//! Differences between what was last applied and what now resolves.
//!
//! Appliers only ever see these deltas. Computing them against the
//! last-applied view, rather than the previous resolved view, means a failed
//! apply shows up again on the next cycle.

use std::collections::{BTreeMap, BTreeSet};

/// Changes to an exclusive aspect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExclusiveDelta<S, V> {
    /// Sub-resources with a new or changed winner.
    pub set: Vec<(S, V)>,
    /// Sub-resources that no longer have any contender.
    pub cleared: Vec<S>,
}

impl<S, V> ExclusiveDelta<S, V> {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.cleared.is_empty()
    }

    pub fn len(&self) -> usize {
        self.set.len() + self.cleared.len()
    }
}

pub fn diff_exclusive<S, V>(
    applied: &BTreeMap<S, V>,
    resolved: &BTreeMap<S, V>,
) -> ExclusiveDelta<S, V>
where
    S: Ord + Clone,
    V: Clone + PartialEq,
{
    let set = resolved
        .iter()
        .filter(|(sub, value)| applied.get(*sub) != Some(*value))
        .map(|(sub, value)| (sub.clone(), value.clone()))
        .collect();
    let cleared = applied
        .keys()
        .filter(|sub| !resolved.contains_key(*sub))
        .cloned()
        .collect();
    ExclusiveDelta { set, cleared }
}

/// Changes to an additive aspect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdditiveDelta<V> {
    pub added: Vec<V>,
    pub removed: Vec<V>,
}

impl<V> AdditiveDelta<V> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn diff_additive<V: Ord + Clone>(
    applied: &BTreeSet<V>,
    resolved: &BTreeSet<V>,
) -> AdditiveDelta<V> {
    AdditiveDelta {
        added: resolved.difference(applied).cloned().collect(),
        removed: applied.difference(resolved).cloned().collect(),
    }
}

/// New value for single-valued aspects, or `None` when nothing changed.
pub fn diff_value<V: Clone + PartialEq>(applied: &V, resolved: &V) -> Option<V> {
    (applied != resolved).then(|| resolved.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_delta() {
        let applied = BTreeMap::from([("head", 1), ("body", 2), ("feet", 3)]);
        let resolved = BTreeMap::from([("head", 1), ("body", 9), ("hands", 4)]);
        let delta = diff_exclusive(&applied, &resolved);
        assert_eq!(delta.set, vec![("body", 9), ("hands", 4)]);
        assert_eq!(delta.cleared, vec!["feet"]);
        assert_eq!(delta.len(), 3);
    }

    #[test]
    fn test_additive_delta() {
        let applied = BTreeSet::from([1, 2]);
        let resolved = BTreeSet::from([2, 3]);
        let delta = diff_additive(&applied, &resolved);
        assert_eq!(delta.added, vec![3]);
        assert_eq!(delta.removed, vec![1]);
    }

    #[test]
    fn test_value_delta() {
        assert_eq!(diff_value(&Some(1), &Some(1)), None);
        assert_eq!(diff_value(&Some(1), &None), Some(None));
    }
}
