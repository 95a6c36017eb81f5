//! Contribution identity and the canonical priority rule.
//!
//! Every value stored in an aspect store is owned by exactly one
//! [`CombinedKey`]. Resolution only ever looks at the key's [`Priority`],
//! the `(Tier, Layer)` pair; the enabler and label are carried for logging
//! and ownership attribution.

use core::cmp::Ordering;
use core::fmt;

/// Source-assigned sub-index inside a tier.
///
/// Restraint sets use `0` for the base set and `n + 1` for sub-layer `n`.
/// Gags and restrictions use their slot index.
pub type Layer = u8;

/// Coarse source kind, the primary priority axis.
///
/// Declaration order is priority order: a gag outranks a restriction, which
/// outranks a restraint set.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Tier {
    RestraintSet,
    Restriction,
    Gag,
}

/// The `(Tier, Layer)` pair compared by every resolver.
///
/// Derived ordering compares tier first and layer second; higher wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Priority {
    pub tier: Tier,
    pub layer: Layer,
}

impl Priority {
    pub const fn new(tier: Tier, layer: Layer) -> Self {
        Self { tier, layer }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tier, self.layer)
    }
}

/// Addresses one source slot. The domain keeps at most one active source per
/// slot, so this is also the lookup key for removals.
pub type SourceId = Priority;

/// Immutable identity of one contribution.
///
/// Equality and the derived `Ord` are structural and only used for storage.
/// Use [`CombinedKey::priority`] or [`compare_priority`] for conflict
/// resolution.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombinedKey {
    pub tier: Tier,
    pub layer: Layer,
    pub enabler: String,
    pub label: String,
}

impl CombinedKey {
    pub fn new(
        tier: Tier,
        layer: Layer,
        enabler: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            tier,
            layer,
            enabler: enabler.into(),
            label: label.into(),
        }
    }

    /// Priority used for conflict resolution.
    pub const fn priority(&self) -> Priority {
        Priority::new(self.tier, self.layer)
    }

    /// Slot this key occupies.
    pub const fn source(&self) -> SourceId {
        self.priority()
    }
}

impl fmt::Display for CombinedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} [{}] by {}",
            self.tier, self.layer, self.label, self.enabler
        )
    }
}

/// Canonical priority comparison: tier first, then layer.
pub fn compare_priority(a: &CombinedKey, b: &CombinedKey) -> Ordering {
    a.priority().cmp(&b.priority())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order() {
        assert!(Tier::RestraintSet < Tier::Restriction);
        assert!(Tier::Restriction < Tier::Gag);
    }

    #[test]
    fn test_tier_dominates_layer() {
        let set = CombinedKey::new(Tier::RestraintSet, 5, "owner", "Set");
        let gag = CombinedKey::new(Tier::Gag, 0, "owner", "Ball Gag");
        assert_eq!(compare_priority(&gag, &set), Ordering::Greater);
    }

    #[test]
    fn test_layer_breaks_tier_ties() {
        let low = CombinedKey::new(Tier::Restriction, 1, "a", "Cuffs");
        let high = CombinedKey::new(Tier::Restriction, 3, "b", "Collar");
        assert_eq!(compare_priority(&low, &high), Ordering::Less);
    }

    #[test]
    fn test_enabler_and_label_ignored_for_priority() {
        let a = CombinedKey::new(Tier::Gag, 2, "alice", "Ring Gag");
        let b = CombinedKey::new(Tier::Gag, 2, "bob", "Bit Gag");
        assert_eq!(compare_priority(&a, &b), Ordering::Equal);
        assert_ne!(a, b);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::RestraintSet.to_string(), "restraint_set");
        assert_eq!("GAG".parse::<Tier>().ok(), Some(Tier::Gag));
    }
}
