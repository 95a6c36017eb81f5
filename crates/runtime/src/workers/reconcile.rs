//! Per-aspect translation of resolved deltas into applier calls.
//!
//! A reconciler diffs the last-applied view against the freshly resolved
//! one and calls its applier for every difference. Only successful calls are
//! folded into the applied view, so a failure stays visible in the next
//! cycle's delta and gets retried.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use cache_core::{
    AspectKind, AspectStore, BodyProfile, EquipSlot, EquipmentStore, GlamourItem, Merge,
    MergedStore, MetaIndex, MetaStore, ModId, ModSettings, ModStore, OverlayKind, OverlayParams,
    OverlayStore, ProfileStore, StatusId, StatusStore, TriState, diff_additive, diff_exclusive,
    diff_value,
};

use crate::api::{
    ApplyResult, EquipmentApplier, MetaApplier, ModApplier, OverlayApplier, ProfileApplier,
    StatusApplier, ValueApplier,
};

/// Tally of applier calls made during one reconcile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ApplyOutcome {
    pub applied: usize,
    pub failures: usize,
}

impl ApplyOutcome {
    /// Records a call result; returns whether it succeeded.
    fn track(&mut self, aspect: AspectKind, operation: &'static str, result: ApplyResult) -> bool {
        match result {
            Ok(()) => {
                self.applied += 1;
                true
            }
            Err(error) => {
                self.failures += 1;
                warn!(%aspect, operation, %error, "applier failed, retrying on next cycle");
                false
            }
        }
    }
}

#[async_trait]
pub(crate) trait Reconciler: Send + Sync + 'static {
    type Store: AspectStore;

    async fn reconcile(
        &self,
        applied: &mut <Self::Store as AspectStore>::View,
        resolved: &<Self::Store as AspectStore>::View,
    ) -> ApplyOutcome;
}

pub(crate) struct EquipmentReconciler(pub Arc<dyn EquipmentApplier>);

#[async_trait]
impl Reconciler for EquipmentReconciler {
    type Store = EquipmentStore;

    async fn reconcile(
        &self,
        applied: &mut BTreeMap<EquipSlot, GlamourItem>,
        resolved: &BTreeMap<EquipSlot, GlamourItem>,
    ) -> ApplyOutcome {
        let delta = diff_exclusive(applied, resolved);
        let mut outcome = ApplyOutcome::default();
        for slot in delta.cleared {
            let result = self.0.clear_slot(slot).await;
            if outcome.track(AspectKind::Equipment, "clear_slot", result) {
                applied.remove(&slot);
            }
        }
        for (slot, item) in delta.set {
            let result = self.0.apply_slot(slot, item).await;
            if outcome.track(AspectKind::Equipment, "apply_slot", result) {
                applied.insert(slot, item);
            }
        }
        outcome
    }
}

pub(crate) struct MetaReconciler(pub Arc<dyn MetaApplier>);

#[async_trait]
impl Reconciler for MetaReconciler {
    type Store = MetaStore;

    async fn reconcile(
        &self,
        applied: &mut BTreeMap<MetaIndex, TriState>,
        resolved: &BTreeMap<MetaIndex, TriState>,
    ) -> ApplyOutcome {
        let delta = diff_exclusive(applied, resolved);
        let mut outcome = ApplyOutcome::default();
        for index in delta.cleared {
            let result = self.0.set_meta_flag(index, TriState::Unset).await;
            if outcome.track(AspectKind::Meta, "set_meta_flag", result) {
                applied.remove(&index);
            }
        }
        for (index, value) in delta.set {
            let result = self.0.set_meta_flag(index, value).await;
            if outcome.track(AspectKind::Meta, "set_meta_flag", result) {
                applied.insert(index, value);
            }
        }
        outcome
    }
}

pub(crate) struct ModReconciler(pub Arc<dyn ModApplier>);

#[async_trait]
impl Reconciler for ModReconciler {
    type Store = ModStore;

    async fn reconcile(
        &self,
        applied: &mut BTreeMap<ModId, ModSettings>,
        resolved: &BTreeMap<ModId, ModSettings>,
    ) -> ApplyOutcome {
        let delta = diff_exclusive(applied, resolved);
        let mut outcome = ApplyOutcome::default();
        for id in delta.cleared {
            let result = self.0.remove_mod(id.clone()).await;
            if outcome.track(AspectKind::Mod, "remove_mod", result) {
                applied.remove(&id);
            }
        }
        // The winner's settings replace whatever was applied; presets never merge.
        for (id, settings) in delta.set {
            let result = self.0.set_or_update_mod(id.clone(), settings.clone()).await;
            if outcome.track(AspectKind::Mod, "set_or_update_mod", result) {
                applied.insert(id, settings);
            }
        }
        outcome
    }
}

pub(crate) struct OverlayReconciler(pub Arc<dyn OverlayApplier>);

#[async_trait]
impl Reconciler for OverlayReconciler {
    type Store = OverlayStore;

    async fn reconcile(
        &self,
        applied: &mut BTreeMap<OverlayKind, OverlayParams>,
        resolved: &BTreeMap<OverlayKind, OverlayParams>,
    ) -> ApplyOutcome {
        let delta = diff_exclusive(applied, resolved);
        let mut outcome = ApplyOutcome::default();
        for kind in delta.cleared {
            let result = self.0.clear_overlay(kind).await;
            if outcome.track(AspectKind::Overlay, "clear_overlay", result) {
                applied.remove(&kind);
            }
        }
        for (kind, params) in delta.set {
            let result = self.0.set_overlay(kind, params.clone()).await;
            if outcome.track(AspectKind::Overlay, "set_overlay", result) {
                applied.insert(kind, params);
            }
        }
        outcome
    }
}

pub(crate) struct StatusReconciler(pub Arc<dyn StatusApplier>);

#[async_trait]
impl Reconciler for StatusReconciler {
    type Store = StatusStore;

    async fn reconcile(
        &self,
        applied: &mut BTreeSet<StatusId>,
        resolved: &BTreeSet<StatusId>,
    ) -> ApplyOutcome {
        let delta = diff_additive(applied, resolved);
        let mut outcome = ApplyOutcome::default();
        if !delta.removed.is_empty() {
            let result = self.0.remove_statuses(delta.removed.clone()).await;
            if outcome.track(AspectKind::Status, "remove_statuses", result) {
                for id in &delta.removed {
                    applied.remove(id);
                }
            }
        }
        if !delta.added.is_empty() {
            let result = self.0.add_statuses(delta.added.clone()).await;
            if outcome.track(AspectKind::Status, "add_statuses", result) {
                applied.extend(delta.added);
            }
        }
        outcome
    }
}

pub(crate) struct ProfileReconciler(pub Arc<dyn ProfileApplier>);

#[async_trait]
impl Reconciler for ProfileReconciler {
    type Store = ProfileStore;

    async fn reconcile(
        &self,
        applied: &mut Option<BodyProfile>,
        resolved: &Option<BodyProfile>,
    ) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();
        match diff_value(applied, resolved) {
            None => {}
            Some(Some(profile)) => {
                let result = self.0.set_profile(profile.id.clone(), profile.priority).await;
                if outcome.track(AspectKind::Profile, "set_profile", result) {
                    *applied = Some(profile);
                }
            }
            Some(None) => {
                let result = self.0.clear_profile().await;
                if outcome.track(AspectKind::Profile, "clear_profile", result) {
                    *applied = None;
                }
            }
        }
        outcome
    }
}

/// Reconciler for merged single-value aspects.
pub(crate) struct ValueReconciler<V> {
    aspect: AspectKind,
    applier: Arc<dyn ValueApplier<V>>,
}

impl<V> ValueReconciler<V> {
    pub(crate) fn new(aspect: AspectKind, applier: Arc<dyn ValueApplier<V>>) -> Self {
        Self { aspect, applier }
    }
}

#[async_trait]
impl<V> Reconciler for ValueReconciler<V>
where
    V: Merge + Send + Sync + fmt::Debug + 'static,
{
    type Store = MergedStore<V>;

    async fn reconcile(&self, applied: &mut V, resolved: &V) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();
        if let Some(value) = diff_value(applied, resolved) {
            let result = self.applier.set_value(value.clone()).await;
            if outcome.track(self.aspect, "set_value", result) {
                *applied = value;
            }
        }
        outcome
    }
}
