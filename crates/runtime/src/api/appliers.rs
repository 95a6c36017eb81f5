//! Downstream adapters that push resolved values into the host.
//!
//! The cache decides which contribution wins; appliers make it so. Each
//! aspect worker owns an `Arc` to its applier and awaits every call before
//! reporting its cycle as done. Appliers receive values by value and never
//! see the stores.
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use cache_core::{
    EquipSlot, GlamourItem, Intensity, MetaIndex, ModId, ModSettings, OverlayKind,
    OverlayParams, ProfileId, StatusId, TraitFlags, TriState,
};

use super::errors::ApplyResult;

#[async_trait]
pub trait EquipmentApplier: Send + Sync {
    async fn apply_slot(&self, slot: EquipSlot, item: GlamourItem) -> ApplyResult;

    async fn clear_slot(&self, slot: EquipSlot) -> ApplyResult;
}

#[async_trait]
pub trait MetaApplier: Send + Sync {
    /// Clearing a flag is expressed as [`TriState::Unset`].
    async fn set_meta_flag(&self, index: MetaIndex, value: TriState) -> ApplyResult;
}

#[async_trait]
pub trait ModApplier: Send + Sync {
    async fn set_or_update_mod(&self, id: ModId, settings: ModSettings) -> ApplyResult;

    async fn remove_mod(&self, id: ModId) -> ApplyResult;
}

#[async_trait]
pub trait StatusApplier: Send + Sync {
    async fn add_statuses(&self, ids: Vec<StatusId>) -> ApplyResult;

    async fn remove_statuses(&self, ids: Vec<StatusId>) -> ApplyResult;
}

#[async_trait]
pub trait ProfileApplier: Send + Sync {
    async fn set_profile(&self, id: ProfileId, priority: i32) -> ApplyResult;

    async fn clear_profile(&self) -> ApplyResult;
}

#[async_trait]
pub trait OverlayApplier: Send + Sync {
    async fn set_overlay(&self, kind: OverlayKind, params: OverlayParams) -> ApplyResult;

    async fn clear_overlay(&self, kind: OverlayKind) -> ApplyResult;
}

/// Applier for merged single-value aspects (traits, intensity).
#[async_trait]
pub trait ValueApplier<V>: Send + Sync {
    async fn set_value(&self, value: V) -> ApplyResult;
}

/// One applier per aspect, handed to the orchestrator at build time.
#[derive(Clone)]
pub struct Appliers {
    pub equipment: Arc<dyn EquipmentApplier>,
    pub meta: Arc<dyn MetaApplier>,
    pub mods: Arc<dyn ModApplier>,
    pub statuses: Arc<dyn StatusApplier>,
    pub profile: Arc<dyn ProfileApplier>,
    pub overlay: Arc<dyn OverlayApplier>,
    pub traits: Arc<dyn ValueApplier<TraitFlags>>,
    pub intensity: Arc<dyn ValueApplier<Intensity>>,
}

impl Appliers {
    /// Uses one adapter for every aspect.
    pub fn uniform<A>(applier: Arc<A>) -> Self
    where
        A: EquipmentApplier
            + MetaApplier
            + ModApplier
            + StatusApplier
            + ProfileApplier
            + OverlayApplier
            + ValueApplier<TraitFlags>
            + ValueApplier<Intensity>
            + 'static,
    {
        Self {
            equipment: applier.clone(),
            meta: applier.clone(),
            mods: applier.clone(),
            statuses: applier.clone(),
            profile: applier.clone(),
            overlay: applier.clone(),
            traits: applier.clone(),
            intensity: applier,
        }
    }
}

/// Applier that only logs what it would do.
/// Useful for dry runs or as a fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingApplier;

#[async_trait]
impl EquipmentApplier for LoggingApplier {
    async fn apply_slot(&self, slot: EquipSlot, item: GlamourItem) -> ApplyResult {
        info!(%slot, item = item.item_id, stain = item.stain, "apply slot");
        Ok(())
    }

    async fn clear_slot(&self, slot: EquipSlot) -> ApplyResult {
        info!(%slot, "clear slot");
        Ok(())
    }
}

#[async_trait]
impl MetaApplier for LoggingApplier {
    async fn set_meta_flag(&self, index: MetaIndex, value: TriState) -> ApplyResult {
        info!(%index, %value, "set meta flag");
        Ok(())
    }
}

#[async_trait]
impl ModApplier for LoggingApplier {
    async fn set_or_update_mod(&self, id: ModId, settings: ModSettings) -> ApplyResult {
        info!(%id, enabled = settings.enabled, priority = settings.priority, "set mod");
        Ok(())
    }

    async fn remove_mod(&self, id: ModId) -> ApplyResult {
        info!(%id, "remove mod");
        Ok(())
    }
}

#[async_trait]
impl StatusApplier for LoggingApplier {
    async fn add_statuses(&self, ids: Vec<StatusId>) -> ApplyResult {
        info!(?ids, "add statuses");
        Ok(())
    }

    async fn remove_statuses(&self, ids: Vec<StatusId>) -> ApplyResult {
        info!(?ids, "remove statuses");
        Ok(())
    }
}

#[async_trait]
impl ProfileApplier for LoggingApplier {
    async fn set_profile(&self, id: ProfileId, priority: i32) -> ApplyResult {
        info!(%id, priority, "set profile");
        Ok(())
    }

    async fn clear_profile(&self) -> ApplyResult {
        info!("clear profile");
        Ok(())
    }
}

#[async_trait]
impl OverlayApplier for LoggingApplier {
    async fn set_overlay(&self, kind: OverlayKind, params: OverlayParams) -> ApplyResult {
        info!(%kind, texture = %params.texture, opacity = params.opacity, "set overlay");
        Ok(())
    }

    async fn clear_overlay(&self, kind: OverlayKind) -> ApplyResult {
        info!(%kind, "clear overlay");
        Ok(())
    }
}

#[async_trait]
impl ValueApplier<TraitFlags> for LoggingApplier {
    async fn set_value(&self, value: TraitFlags) -> ApplyResult {
        info!(traits = ?value, "set traits");
        Ok(())
    }
}

#[async_trait]
impl ValueApplier<Intensity> for LoggingApplier {
    async fn set_value(&self, value: Intensity) -> ApplyResult {
        info!(intensity = value.0, "set intensity");
        Ok(())
    }
}
