//! Worker tasks that back the cache orchestration.
//!
//! Each aspect gets its own single-writer worker. [`AspectChannels`] holds
//! the sending halves in the fixed dispatch order used by the orchestrator.

mod aspect;
mod reconcile;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use cache_core::{
    AspectKind, AspectStore, EquipmentStore, IntensityStore, MetaStore, ModStore, OverlayStore,
    ProfileStore, StatusStore, TraitStore,
};

use crate::api::Appliers;

pub(crate) use aspect::{
    AspectHandle, AspectView, PendingCycle, StoreOp, join_cycles, wait_view,
};
use aspect::AspectWorker;
use reconcile::{
    EquipmentReconciler, MetaReconciler, ModReconciler, OverlayReconciler, ProfileReconciler,
    Reconciler, StatusReconciler, ValueReconciler,
};

/// Sending halves of every aspect worker.
#[derive(Clone)]
pub(crate) struct AspectChannels {
    pub equipment: AspectHandle<EquipmentStore>,
    pub meta: AspectHandle<MetaStore>,
    pub mods: AspectHandle<ModStore>,
    pub statuses: AspectHandle<StatusStore>,
    pub profile: AspectHandle<ProfileStore>,
    pub overlay: AspectHandle<OverlayStore>,
    pub traits: AspectHandle<TraitStore>,
    pub intensity: AspectHandle<IntensityStore>,
}

impl AspectChannels {
    /// Spawns one worker per aspect and returns their handles.
    pub(crate) fn spawn(appliers: Appliers, buffer: usize) -> (Self, Vec<JoinHandle<()>>) {
        let mut tasks = Vec::with_capacity(8);
        let channels = Self {
            equipment: spawn_worker(
                EquipmentStore::new(AspectKind::Equipment),
                EquipmentReconciler(appliers.equipment),
                buffer,
                &mut tasks,
            ),
            meta: spawn_worker(
                MetaStore::new(AspectKind::Meta),
                MetaReconciler(appliers.meta),
                buffer,
                &mut tasks,
            ),
            mods: spawn_worker(
                ModStore::new(AspectKind::Mod),
                ModReconciler(appliers.mods),
                buffer,
                &mut tasks,
            ),
            statuses: spawn_worker(
                StatusStore::default(),
                StatusReconciler(appliers.statuses),
                buffer,
                &mut tasks,
            ),
            profile: spawn_worker(
                ProfileStore::new(),
                ProfileReconciler(appliers.profile),
                buffer,
                &mut tasks,
            ),
            overlay: spawn_worker(
                OverlayStore::new(AspectKind::Overlay),
                OverlayReconciler(appliers.overlay),
                buffer,
                &mut tasks,
            ),
            traits: spawn_worker(
                TraitStore::default(),
                ValueReconciler::new(AspectKind::Traits, appliers.traits),
                buffer,
                &mut tasks,
            ),
            intensity: spawn_worker(
                IntensityStore::default(),
                ValueReconciler::new(AspectKind::Intensity, appliers.intensity),
                buffer,
                &mut tasks,
            ),
        };
        (channels, tasks)
    }

    /// Enqueues a clear on every aspect, in dispatch order.
    pub(crate) async fn clear_all(&self) -> crate::Result<Vec<PendingCycle>> {
        Ok(vec![
            self.equipment.clear().await?,
            self.meta.clear().await?,
            self.mods.clear().await?,
            self.statuses.clear().await?,
            self.profile.clear().await?,
            self.overlay.clear().await?,
            self.traits.clear().await?,
            self.intensity.clear().await?,
        ])
    }
}

fn spawn_worker<R: Reconciler>(
    store: R::Store,
    reconciler: R,
    buffer: usize,
    tasks: &mut Vec<JoinHandle<()>>,
) -> AspectHandle<R::Store> {
    let aspect = store.kind();
    let (command_tx, command_rx) = mpsc::channel(buffer);
    let worker = AspectWorker::new(store, reconciler, command_rx);
    tasks.push(tokio::spawn(async move {
        worker.run().await;
    }));
    AspectHandle::new(aspect, command_tx)
}
