//! Per-aspect decomposition of a single source.

use std::collections::{BTreeMap, BTreeSet};

use crate::aspect::AspectMask;
use crate::items::ItemEffects;
use crate::values::{
    BodyProfile, EquipSlot, GlamourItem, Intensity, MetaIndex, ModId, ModSettings, OverlayKind,
    OverlayParams, StatusId, TraitFlags, TriState,
};

/// What one combined key contributes to each aspect.
///
/// An empty part means the source does not touch that aspect at all, so
/// adding or removing the source never wakes that aspect's worker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContributionSet {
    pub equipment: BTreeMap<EquipSlot, GlamourItem>,
    pub meta: BTreeMap<MetaIndex, TriState>,
    pub mods: BTreeMap<ModId, ModSettings>,
    pub statuses: BTreeSet<StatusId>,
    pub profile: Option<BodyProfile>,
    pub overlays: BTreeMap<OverlayKind, OverlayParams>,
    pub traits: TraitFlags,
    pub intensity: Intensity,
}

impl ContributionSet {
    pub fn from_effects(effects: &ItemEffects) -> Self {
        Self {
            equipment: effects.glamour.clone(),
            meta: effects.meta.forced().collect(),
            mods: effects
                .mods
                .iter()
                .map(|preset| (preset.id.clone(), preset.settings.clone()))
                .collect(),
            statuses: effects.statuses.clone(),
            profile: effects.profile.clone(),
            overlays: BTreeMap::new(),
            traits: effects.traits,
            intensity: effects.intensity,
        }
    }

    /// Aspects this set actually contributes to.
    pub fn aspects(&self) -> AspectMask {
        let mut mask = AspectMask::empty();
        mask.set(AspectMask::EQUIPMENT, !self.equipment.is_empty());
        mask.set(AspectMask::META, !self.meta.is_empty());
        mask.set(AspectMask::MOD, !self.mods.is_empty());
        mask.set(AspectMask::STATUS, !self.statuses.is_empty());
        mask.set(AspectMask::PROFILE, self.profile.is_some());
        mask.set(AspectMask::OVERLAY, !self.overlays.is_empty());
        mask.set(AspectMask::TRAITS, !self.traits.is_empty());
        mask.set(AspectMask::INTENSITY, !self.intensity.is_none());
        mask
    }

    pub fn is_empty(&self) -> bool {
        self.aspects().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ModPreset;

    #[test]
    fn test_empty_effects_touch_nothing() {
        let set = ContributionSet::from_effects(&ItemEffects::default());
        assert!(set.is_empty());
    }

    #[test]
    fn test_aspects_reflect_populated_parts() {
        let effects = ItemEffects::default()
            .with_glamour(EquipSlot::Head, GlamourItem::new(1001, 0))
            .with_mod(ModPreset::new("latex", ModSettings::enabled(5)))
            .with_intensity(Intensity(3));
        let set = ContributionSet::from_effects(&effects);
        assert_eq!(
            set.aspects(),
            AspectMask::EQUIPMENT | AspectMask::MOD | AspectMask::INTENSITY
        );
    }

    #[test]
    fn test_duplicate_mod_ids_keep_last_settings() {
        let effects = ItemEffects::default()
            .with_mod(ModPreset::new("latex", ModSettings::enabled(1)))
            .with_mod(ModPreset::new("latex", ModSettings::enabled(9)));
        let set = ContributionSet::from_effects(&effects);
        assert_eq!(set.mods.len(), 1);
        assert_eq!(set.mods[&ModId::new("latex")].priority, 9);
    }
}
