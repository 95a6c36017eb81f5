//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cache_core::{
    BodyProfile, EquipSlot, GagItem, GlamourItem, Intensity, ItemEffects, MetaIndex, ModId,
    ModSettings, OverlayKind, OverlayParams, ProfileId, RestraintSet, RestrictionItem,
    RestrictionKind, StatusId, TraitFlags, TriState,
};
use runtime::{
    Appliers, ApplyError, ApplyResult, CacheHandle, CacheOrchestrator, EquipmentApplier,
    MetaApplier, ModApplier, OverlayApplier, ProfileApplier, StatusApplier, ValueApplier,
};

pub const HAT_A: GlamourItem = GlamourItem::new(1001, 0);
pub const HAT_B: GlamourItem = GlamourItem::new(2002, 3);

/// Every applier call observed by [`RecordingApplier`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    ApplySlot(EquipSlot, GlamourItem),
    ClearSlot(EquipSlot),
    SetMeta(MetaIndex, TriState),
    SetMod(ModId, ModSettings),
    RemoveMod(ModId),
    AddStatuses(Vec<StatusId>),
    RemoveStatuses(Vec<StatusId>),
    SetProfile(ProfileId, i32),
    ClearProfile,
    SetOverlay(OverlayKind, OverlayParams),
    ClearOverlay(OverlayKind),
    Traits(TraitFlags),
    Intensity(Intensity),
}

/// Applier that records successful calls and can be told to fail.
#[derive(Default)]
pub struct RecordingApplier {
    calls: Mutex<Vec<Call>>,
    failing: AtomicBool,
}

impl RecordingApplier {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns and forgets every call recorded so far.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn record(&self, call: Call) -> ApplyResult {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApplyError::Unavailable);
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl EquipmentApplier for RecordingApplier {
    async fn apply_slot(&self, slot: EquipSlot, item: GlamourItem) -> ApplyResult {
        self.record(Call::ApplySlot(slot, item))
    }

    async fn clear_slot(&self, slot: EquipSlot) -> ApplyResult {
        self.record(Call::ClearSlot(slot))
    }
}

#[async_trait]
impl MetaApplier for RecordingApplier {
    async fn set_meta_flag(&self, index: MetaIndex, value: TriState) -> ApplyResult {
        self.record(Call::SetMeta(index, value))
    }
}

#[async_trait]
impl ModApplier for RecordingApplier {
    async fn set_or_update_mod(&self, id: ModId, settings: ModSettings) -> ApplyResult {
        self.record(Call::SetMod(id, settings))
    }

    async fn remove_mod(&self, id: ModId) -> ApplyResult {
        self.record(Call::RemoveMod(id))
    }
}

#[async_trait]
impl StatusApplier for RecordingApplier {
    async fn add_statuses(&self, ids: Vec<StatusId>) -> ApplyResult {
        self.record(Call::AddStatuses(ids))
    }

    async fn remove_statuses(&self, ids: Vec<StatusId>) -> ApplyResult {
        self.record(Call::RemoveStatuses(ids))
    }
}

#[async_trait]
impl ProfileApplier for RecordingApplier {
    async fn set_profile(&self, id: ProfileId, priority: i32) -> ApplyResult {
        self.record(Call::SetProfile(id, priority))
    }

    async fn clear_profile(&self) -> ApplyResult {
        self.record(Call::ClearProfile)
    }
}

#[async_trait]
impl OverlayApplier for RecordingApplier {
    async fn set_overlay(&self, kind: OverlayKind, params: OverlayParams) -> ApplyResult {
        self.record(Call::SetOverlay(kind, params))
    }

    async fn clear_overlay(&self, kind: OverlayKind) -> ApplyResult {
        self.record(Call::ClearOverlay(kind))
    }
}

#[async_trait]
impl ValueApplier<TraitFlags> for RecordingApplier {
    async fn set_value(&self, value: TraitFlags) -> ApplyResult {
        self.record(Call::Traits(value))
    }
}

#[async_trait]
impl ValueApplier<Intensity> for RecordingApplier {
    async fn set_value(&self, value: Intensity) -> ApplyResult {
        self.record(Call::Intensity(value))
    }
}

/// Orchestrator wired to one recording applier for every aspect.
pub async fn start() -> (CacheOrchestrator, CacheHandle, Arc<RecordingApplier>) {
    start_with(CacheOrchestrator::builder()).await
}

pub async fn start_with(
    builder: runtime::CacheOrchestratorBuilder,
) -> (CacheOrchestrator, CacheHandle, Arc<RecordingApplier>) {
    let applier = Arc::new(RecordingApplier::default());
    let orchestrator = builder
        .appliers(Appliers::uniform(applier.clone()))
        .build()
        .await
        .expect("orchestrator should build");
    let handle = orchestrator.handle();
    (orchestrator, handle, applier)
}

pub fn head(item: GlamourItem) -> ItemEffects {
    ItemEffects::default().with_glamour(EquipSlot::Head, item)
}

pub fn gag(id: &str, effects: ItemEffects) -> GagItem {
    GagItem::new(id, format!("{id} gag"), effects)
}

pub fn restriction(id: &str, effects: ItemEffects) -> RestrictionItem {
    RestrictionItem::new(id, format!("{id} restriction"), RestrictionKind::Normal, effects)
}

pub fn restraint_set(id: &str, base: ItemEffects) -> RestraintSet {
    RestraintSet::new(id, format!("{id} set"), base)
}

pub fn profile(id: &str, priority: i32) -> ItemEffects {
    ItemEffects::default().with_profile(BodyProfile::new(id, priority))
}

/// Compares calls ignoring order. Different aspects apply concurrently, so
/// only calls within one aspect have a fixed order.
pub fn assert_calls_unordered(actual: Vec<Call>, expected: Vec<Call>) {
    assert_eq!(actual.len(), expected.len(), "calls: {actual:?}");
    for call in &expected {
        assert!(actual.contains(call), "missing {call:?} in {actual:?}");
    }
}
