//! Item definitions consumed by the cache.
//!
//! Definitions are authored elsewhere and handed over by domain managers or
//! looked up through an [`crate::ItemCatalog`]. The cache never mutates them;
//! it only decomposes them into per-aspect contributions.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use bitflags::bitflags;

use crate::contribution::ContributionSet;
use crate::key::Layer;
use crate::values::{
    BodyProfile, EquipSlot, GlamourItem, Intensity, MetaIndex, ModPreset, OverlayKind,
    OverlayParams, StatusId, TraitFlags, TriState,
};

/// Errors raised while reading item definitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("restraint set {set} has {count} layers, index {index} is out of range")]
    LayerOutOfRange {
        set: ItemId,
        index: usize,
        count: usize,
    },
}

/// Identity of an authored item.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Meta toggles an item forces. `Unset` entries leave the flag alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MetaOverrides {
    pub headgear: TriState,
    pub visor: TriState,
    pub weapon: TriState,
}

impl MetaOverrides {
    pub const fn get(&self, index: MetaIndex) -> TriState {
        match index {
            MetaIndex::Headgear => self.headgear,
            MetaIndex::Visor => self.visor,
            MetaIndex::Weapon => self.weapon,
        }
    }

    /// Iterates the overrides that actually force a value.
    pub fn forced(&self) -> impl Iterator<Item = (MetaIndex, TriState)> + '_ {
        use strum::IntoEnumIterator;
        MetaIndex::iter()
            .map(|index| (index, self.get(index)))
            .filter(|(_, value)| value.is_set())
    }
}

/// Everything one source can contribute, before decomposition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemEffects {
    pub glamour: BTreeMap<EquipSlot, GlamourItem>,
    pub meta: MetaOverrides,
    pub mods: Vec<ModPreset>,
    pub statuses: BTreeSet<StatusId>,
    pub profile: Option<BodyProfile>,
    pub traits: TraitFlags,
    pub intensity: Intensity,
}

impl ItemEffects {
    #[must_use]
    pub fn with_glamour(mut self, slot: EquipSlot, item: GlamourItem) -> Self {
        self.glamour.insert(slot, item);
        self
    }

    #[must_use]
    pub fn with_meta(mut self, index: MetaIndex, value: TriState) -> Self {
        match index {
            MetaIndex::Headgear => self.meta.headgear = value,
            MetaIndex::Visor => self.meta.visor = value,
            MetaIndex::Weapon => self.meta.weapon = value,
        }
        self
    }

    #[must_use]
    pub fn with_mod(mut self, preset: ModPreset) -> Self {
        self.mods.push(preset);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusId) -> Self {
        self.statuses.insert(status);
        self
    }

    #[must_use]
    pub fn with_profile(mut self, profile: BodyProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    #[must_use]
    pub fn with_traits(mut self, traits: TraitFlags) -> Self {
        self.traits |= traits;
        self
    }

    #[must_use]
    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }
}

/// A mouth gag occupying one gag slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GagItem {
    pub id: ItemId,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: ItemEffects,
}

impl GagItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, effects: ItemEffects) -> Self {
        Self {
            id: ItemId::new(id),
            label: label.into(),
            effects,
        }
    }

    pub fn contributions(&self) -> ContributionSet {
        ContributionSet::from_effects(&self.effects)
    }
}

/// Restriction flavour. Blindfolds and hypnotic items may add an overlay.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum RestrictionKind {
    #[default]
    Normal,
    Blindfold,
    Hypnotic,
}

impl RestrictionKind {
    pub const fn overlay_kind(self) -> Option<OverlayKind> {
        match self {
            Self::Normal => None,
            Self::Blindfold => Some(OverlayKind::Blindfold),
            Self::Hypnotic => Some(OverlayKind::Hypnotic),
        }
    }
}

/// A single wearable restriction occupying one restriction slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestrictionItem {
    pub id: ItemId,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: RestrictionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: ItemEffects,
    #[cfg_attr(feature = "serde", serde(default))]
    pub overlay: Option<OverlayParams>,
}

impl RestrictionItem {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: RestrictionKind,
        effects: ItemEffects,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            label: label.into(),
            kind,
            effects,
            overlay: None,
        }
    }

    #[must_use]
    pub fn with_overlay(mut self, params: OverlayParams) -> Self {
        self.overlay = Some(params);
        self
    }

    /// Decomposes the item; the overlay only contributes for blindfold and
    /// hypnotic kinds that carry parameters.
    pub fn contributions(&self) -> ContributionSet {
        let mut set = ContributionSet::from_effects(&self.effects);
        if let (Some(kind), Some(params)) = (self.kind.overlay_kind(), &self.overlay) {
            set.overlays.insert(kind, params.clone());
        }
        if self.kind == RestrictionKind::Blindfold {
            set.traits |= TraitFlags::BLINDFOLDED;
        }
        set
    }
}

/// One optional layer stacked on top of a restraint set's base.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestraintLayer {
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: ItemEffects,
}

/// A multi-layer restraint set. The base sits at layer 0 and sub-layer `n`
/// sits at layer `n + 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestraintSet {
    pub id: ItemId,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: ItemEffects,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layers: Vec<RestraintLayer>,
}

impl RestraintSet {
    /// Layer the base occupies.
    pub const BASE_LAYER: Layer = 0;

    pub fn new(id: impl Into<String>, label: impl Into<String>, base: ItemEffects) -> Self {
        Self {
            id: ItemId::new(id),
            label: label.into(),
            base,
            layers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_layer(mut self, label: impl Into<String>, effects: ItemEffects) -> Self {
        self.layers.push(RestraintLayer {
            label: label.into(),
            effects,
        });
        self
    }

    pub fn base_contributions(&self) -> ContributionSet {
        ContributionSet::from_effects(&self.base)
    }

    pub fn layer(&self, index: usize) -> Result<&RestraintLayer, ItemError> {
        self.layers.get(index).ok_or_else(|| ItemError::LayerOutOfRange {
            set: self.id.clone(),
            index,
            count: self.layers.len(),
        })
    }

    /// Cache layer of sub-layer `index`, or `None` past the last layer a
    /// [`Layer`] can address.
    pub fn cache_layer(index: usize) -> Option<Layer> {
        Layer::try_from(index).ok()?.checked_add(1)
    }

    pub fn layer_label(&self, index: usize) -> String {
        match self.layers.get(index) {
            Some(layer) if !layer.label.is_empty() => format!("{} / {}", self.label, layer.label),
            _ => format!("{} / layer {}", self.label, index + 1),
        }
    }
}

bitflags! {
    /// Selection of restraint-set sub-layers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct LayerMask: u8 {
        const LAYER_1 = 1 << 0;
        const LAYER_2 = 1 << 1;
        const LAYER_3 = 1 << 2;
        const LAYER_4 = 1 << 3;
        const LAYER_5 = 1 << 4;
        const LAYER_6 = 1 << 5;
        const LAYER_7 = 1 << 6;
        const LAYER_8 = 1 << 7;
    }
}

impl LayerMask {
    /// Mask selecting sub-layer `index`, if it fits.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < 8).then(|| Self::from_bits_retain(1 << index))
    }

    /// Sub-layer indices in ascending order.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..8).filter(move |index| self.bits() & (1 << index) != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AspectMask;

    #[test]
    fn test_restriction_overlay_only_for_overlay_kinds() {
        let params = OverlayParams::new("blindfold_lace.tex", 200);
        let normal = RestrictionItem::new(
            "cuffs",
            "Cuffs",
            RestrictionKind::Normal,
            ItemEffects::default(),
        )
        .with_overlay(params.clone());
        assert!(normal.contributions().overlays.is_empty());

        let blindfold = RestrictionItem::new(
            "lace",
            "Lace Blindfold",
            RestrictionKind::Blindfold,
            ItemEffects::default(),
        )
        .with_overlay(params.clone());
        let set = blindfold.contributions();
        assert_eq!(set.overlays.get(&OverlayKind::Blindfold), Some(&params));
        assert!(set.traits.contains(TraitFlags::BLINDFOLDED));
    }

    #[test]
    fn test_hypnotic_without_params_has_no_overlay() {
        let item = RestrictionItem::new(
            "spiral",
            "Spiral",
            RestrictionKind::Hypnotic,
            ItemEffects::default(),
        );
        let set = item.contributions();
        assert!(!set.aspects().contains(AspectMask::OVERLAY));
    }

    #[test]
    fn test_layer_lookup() {
        let set = RestraintSet::new("harness", "Harness", ItemEffects::default())
            .with_layer("Straps", ItemEffects::default());
        assert!(set.layer(0).is_ok());
        assert_eq!(
            set.layer(3),
            Err(ItemError::LayerOutOfRange {
                set: ItemId::new("harness"),
                index: 3,
                count: 1
            })
        );
        assert_eq!(RestraintSet::cache_layer(0), Some(1));
        assert_eq!(set.layer_label(0), "Harness / Straps");
    }

    #[test]
    fn test_cache_layer_rejects_unaddressable_indices() {
        assert_eq!(RestraintSet::cache_layer(254), Some(255));
        assert_eq!(RestraintSet::cache_layer(255), None);
        assert_eq!(RestraintSet::cache_layer(256), None);
    }

    #[test]
    fn test_layer_mask_indices() {
        let mask = LayerMask::LAYER_1 | LayerMask::LAYER_3;
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(LayerMask::from_index(7), Some(LayerMask::LAYER_8));
        assert_eq!(LayerMask::from_index(8), None);
    }

    #[test]
    fn test_meta_overrides_skip_unset() {
        let effects = ItemEffects::default().with_meta(MetaIndex::Visor, TriState::On);
        let forced: Vec<_> = effects.meta.forced().collect();
        assert_eq!(forced, vec![(MetaIndex::Visor, TriState::On)]);
    }
}
