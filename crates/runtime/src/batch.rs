//! Staging of one logical mutation across every affected aspect.
//!
//! A [`Batch`] collects per-aspect store operations while the dispatch lock
//! is held, then enqueues them on the workers in fixed aspect order. Only
//! aspects the mutation actually touches receive a cycle.
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use cache_core::{
    AspectKind, AspectMask, AspectStore, BodyProfile, CombinedKey, ContributionSet, EquipSlot,
    GlamourItem, Intensity, ItemId, MetaIndex, ModId, ModSettings, OverlayKind, OverlayParams,
    RestraintSet, SourceId, StatusId, Tier, TraitFlags, TriState,
};

use crate::api::Result;
use crate::registry::{ActiveSource, SourceRegistry};
use crate::workers::{AspectChannels, AspectHandle, PendingCycle, StoreOp};

#[derive(Debug, Default)]
pub(crate) struct Batch {
    equipment: Vec<StoreOp<BTreeMap<EquipSlot, GlamourItem>>>,
    meta: Vec<StoreOp<BTreeMap<MetaIndex, TriState>>>,
    mods: Vec<StoreOp<BTreeMap<ModId, ModSettings>>>,
    statuses: Vec<StoreOp<BTreeSet<StatusId>>>,
    profile: Vec<StoreOp<BodyProfile>>,
    overlay: Vec<StoreOp<BTreeMap<OverlayKind, OverlayParams>>>,
    traits: Vec<StoreOp<TraitFlags>>,
    intensity: Vec<StoreOp<Intensity>>,
    touched: AspectMask,
}

impl Batch {
    /// Stages `key`'s contributions, replacing whatever occupied its slot.
    ///
    /// A different key in the same slot is removed from every aspect it
    /// touched. The same key is only removed from aspects its new definition
    /// no longer covers; the rest are replaced in place by the add. Replacing
    /// a restraint set's base with another set also removes the previous
    /// set's sub-layers.
    pub(crate) fn stage_add(
        &mut self,
        registry: &mut SourceRegistry,
        key: CombinedKey,
        item: ItemId,
        contributions: ContributionSet,
    ) {
        let aspects = contributions.aspects();
        if let Some(previous) = registry.get(&key.source()).cloned() {
            if is_set_base(&key) && previous.item != item {
                debug!(old = %previous.item, new = %item, "restraint set replaced");
                self.stage_remove_set(registry, &previous.item);
            } else if previous.key == key {
                let dropped = previous.aspects.difference(aspects);
                self.remove(&key, dropped);
            } else {
                debug!(old = %previous.key, new = %key, "source slot replaced");
                self.remove(&previous.key, previous.aspects);
            }
        }
        self.add(&key, contributions);
        registry.insert(ActiveSource { key, item, aspects });
    }

    /// Stages removal of the source in `source` if it still holds `item`.
    ///
    /// Returns `false` for stale removals, which are no-ops.
    pub(crate) fn stage_remove(
        &mut self,
        registry: &mut SourceRegistry,
        source: SourceId,
        item: Option<&ItemId>,
    ) -> bool {
        match registry.get(&source) {
            Some(active) if item.is_none_or(|item| *item == active.item) => {
                let active = active.clone();
                registry.remove(&source);
                self.remove(&active.key, active.aspects);
                true
            }
            Some(active) => {
                debug!(
                    %source,
                    held = %active.item,
                    requested = ?item,
                    "stale removal: slot holds another item"
                );
                false
            }
            None => {
                debug!(%source, "stale removal: slot is empty");
                false
            }
        }
    }

    /// Stages removal of every registered layer of restraint set `set`, its
    /// base included. Returns `false` when none is registered.
    pub(crate) fn stage_remove_set(&mut self, registry: &mut SourceRegistry, set: &ItemId) -> bool {
        let layers: Vec<SourceId> = registry
            .entries()
            .filter(|entry| entry.key.tier == Tier::RestraintSet)
            .filter(|entry| entry.item == *set)
            .map(|entry| entry.key.source())
            .collect();
        for source in &layers {
            self.stage_remove(registry, *source, Some(set));
        }
        !layers.is_empty()
    }

    /// Forces a cycle on every aspect, even those without ops.
    pub(crate) fn touch_all(&mut self) {
        self.touched = AspectMask::all();
    }

    pub(crate) fn touched(&self) -> AspectMask {
        self.touched
    }

    fn add(&mut self, key: &CombinedKey, set: ContributionSet) {
        let aspects = set.aspects();
        let ContributionSet {
            equipment,
            meta,
            mods,
            statuses,
            profile,
            overlays,
            traits,
            intensity,
        } = set;
        if !equipment.is_empty() {
            self.equipment.push(StoreOp::Add(key.clone(), equipment));
        }
        if !meta.is_empty() {
            self.meta.push(StoreOp::Add(key.clone(), meta));
        }
        if !mods.is_empty() {
            self.mods.push(StoreOp::Add(key.clone(), mods));
        }
        if !statuses.is_empty() {
            self.statuses.push(StoreOp::Add(key.clone(), statuses));
        }
        if let Some(profile) = profile {
            self.profile.push(StoreOp::Add(key.clone(), profile));
        }
        if !overlays.is_empty() {
            self.overlay.push(StoreOp::Add(key.clone(), overlays));
        }
        if !traits.is_empty() {
            self.traits.push(StoreOp::Add(key.clone(), traits));
        }
        if !intensity.is_none() {
            self.intensity.push(StoreOp::Add(key.clone(), intensity));
        }
        self.touched |= aspects;
    }

    fn remove(&mut self, key: &CombinedKey, aspects: AspectMask) {
        for kind in aspects.kinds() {
            let key = key.clone();
            match kind {
                AspectKind::Equipment => self.equipment.push(StoreOp::Remove(key)),
                AspectKind::Meta => self.meta.push(StoreOp::Remove(key)),
                AspectKind::Mod => self.mods.push(StoreOp::Remove(key)),
                AspectKind::Status => self.statuses.push(StoreOp::Remove(key)),
                AspectKind::Profile => self.profile.push(StoreOp::Remove(key)),
                AspectKind::Overlay => self.overlay.push(StoreOp::Remove(key)),
                AspectKind::Traits => self.traits.push(StoreOp::Remove(key)),
                AspectKind::Intensity => self.intensity.push(StoreOp::Remove(key)),
            }
        }
        self.touched |= aspects;
    }

    /// Enqueues every touched aspect in dispatch order.
    ///
    /// Must be called while the dispatch lock is held so that concurrent
    /// mutations reach every worker in the same order.
    pub(crate) async fn dispatch(self, channels: &AspectChannels) -> Result<Vec<PendingCycle>> {
        let touched = self.touched;
        let mut pending = Vec::with_capacity(touched.bits().count_ones() as usize);
        submit(&mut pending, touched, &channels.equipment, self.equipment).await?;
        submit(&mut pending, touched, &channels.meta, self.meta).await?;
        submit(&mut pending, touched, &channels.mods, self.mods).await?;
        submit(&mut pending, touched, &channels.statuses, self.statuses).await?;
        submit(&mut pending, touched, &channels.profile, self.profile).await?;
        submit(&mut pending, touched, &channels.overlay, self.overlay).await?;
        submit(&mut pending, touched, &channels.traits, self.traits).await?;
        submit(&mut pending, touched, &channels.intensity, self.intensity).await?;
        Ok(pending)
    }
}

async fn submit<S: AspectStore>(
    pending: &mut Vec<PendingCycle>,
    touched: AspectMask,
    handle: &AspectHandle<S>,
    ops: Vec<StoreOp<S::Contribution>>,
) -> Result<()> {
    if touched.contains_kind(handle.aspect()) {
        pending.push(handle.submit(ops).await?);
    }
    Ok(())
}

fn is_set_base(key: &CombinedKey) -> bool {
    key.tier == Tier::RestraintSet && key.layer == RestraintSet::BASE_LAYER
}
