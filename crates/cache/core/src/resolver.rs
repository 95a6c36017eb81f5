//! Resolution algorithms shared by every aspect store.
//!
//! Stores only gather candidates; deciding the effective value lives here so
//! that every exclusive aspect, meta flags included, goes through the same
//! rule.
//!
//! - **Exclusive**: highest `(Tier, Layer)` wins, later insertion breaks ties
//! - **Additive**: set union, deduplicated by identity
//! - **Merged**: fold with [`Merge`] (bitwise OR, numeric max)
//! - **Profile**: highest explicit profile priority, later insertion breaks ties

use std::collections::BTreeSet;

use crate::key::CombinedKey;
use crate::values::{BodyProfile, Intensity, TraitFlags};

/// One stored value competing for a sub-resource.
#[derive(Debug)]
pub struct Candidate<'a, V> {
    pub key: &'a CombinedKey,
    /// Insertion sequence, strictly increasing per store.
    pub seq: u64,
    pub value: &'a V,
}

impl<V> Clone for Candidate<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Candidate<'_, V> {}

/// Picks the exclusive winner: maximum priority, then latest insertion.
pub fn resolve_exclusive<'a, V>(
    candidates: impl IntoIterator<Item = Candidate<'a, V>>,
) -> Option<Candidate<'a, V>> {
    candidates
        .into_iter()
        .max_by_key(|candidate| (candidate.key.priority(), candidate.seq))
}

/// Union of every active set.
pub fn resolve_additive<'a, V>(sets: impl IntoIterator<Item = &'a BTreeSet<V>>) -> BTreeSet<V>
where
    V: Ord + Clone + 'a,
{
    sets.into_iter().flatten().cloned().collect()
}

/// Values folded across all active contributions.
pub trait Merge: Clone + Default + PartialEq {
    #[must_use]
    fn merge(self, other: &Self) -> Self;
}

impl Merge for TraitFlags {
    fn merge(self, other: &Self) -> Self {
        self | *other
    }
}

impl Merge for Intensity {
    fn merge(self, other: &Self) -> Self {
        self.max(*other)
    }
}

pub fn resolve_merged<'a, V>(values: impl IntoIterator<Item = &'a V>) -> V
where
    V: Merge + 'a,
{
    values
        .into_iter()
        .fold(V::default(), |acc, value| acc.merge(value))
}

/// Picks the active body profile by its own priority field.
pub fn resolve_profile<'a>(
    candidates: impl IntoIterator<Item = Candidate<'a, BodyProfile>>,
) -> Option<Candidate<'a, BodyProfile>> {
    candidates
        .into_iter()
        .max_by_key(|candidate| (candidate.value.priority, candidate.seq))
}
