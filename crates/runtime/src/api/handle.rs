//! Cloneable façade for mutating the cache.
//!
//! [`CacheHandle`] hides worker plumbing and offers one async method per
//! source lifecycle event. Each method is one logical transaction: it stages
//! ops for every affected aspect under the dispatch lock, enqueues them in
//! fixed aspect order, then awaits every touched aspect's cycle.
use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};

use cache_core::{
    AspectKind, CombinedKey, ContributionSet, GagItem, ItemCatalog, ItemId, Layer, LayerMask,
    Priority, RestraintSet, RestrictionItem, SourceId, Tier,
};

use super::errors::{Result, RuntimeError};
use super::report::{MutationReport, ResolvedState};
use crate::batch::Batch;
use crate::registry::{ActiveSource, SourceRegistry};
use crate::snapshot::{CacheSnapshot, SnapshotEntry};
use crate::workers::{AspectChannels, AspectView, join_cycles, wait_view};

/// Client-facing handle to the cache orchestrator.
#[derive(Clone)]
pub struct CacheHandle {
    channels: AspectChannels,
    /// Dispatch lock. Held while staging and enqueueing, never while
    /// awaiting worker replies.
    registry: Arc<Mutex<SourceRegistry>>,
    catalog: Option<Arc<dyn ItemCatalog>>,
}

/// One source a snapshot wants active.
struct PlannedSource {
    key: CombinedKey,
    item: ItemId,
    contributions: ContributionSet,
}

impl CacheHandle {
    pub(crate) fn new(channels: AspectChannels, catalog: Option<Arc<dyn ItemCatalog>>) -> Self {
        Self {
            channels,
            registry: Arc::new(Mutex::new(SourceRegistry::default())),
            catalog,
        }
    }

    /// Activates a gag in slot `layer`.
    pub async fn add_gag(
        &self,
        item: &GagItem,
        layer: Layer,
        enabler: impl Into<String>,
    ) -> Result<MutationReport> {
        let key = CombinedKey::new(Tier::Gag, layer, enabler, item.label.clone());
        let (id, contributions) = (item.id.clone(), item.contributions());
        self.commit(move |batch, registry| {
            batch.stage_add(registry, key, id, contributions);
        })
        .await
    }

    /// Deactivates the gag in slot `layer`. A no-op when the slot holds a
    /// different item or nothing at all.
    pub async fn remove_gag(&self, item: &ItemId, layer: Layer) -> Result<MutationReport> {
        self.remove_source(Priority::new(Tier::Gag, layer), item.clone())
            .await
    }

    pub async fn add_restriction(
        &self,
        item: &RestrictionItem,
        layer: Layer,
        enabler: impl Into<String>,
    ) -> Result<MutationReport> {
        let key = CombinedKey::new(Tier::Restriction, layer, enabler, item.label.clone());
        let (id, contributions) = (item.id.clone(), item.contributions());
        self.commit(move |batch, registry| {
            batch.stage_add(registry, key, id, contributions);
        })
        .await
    }

    pub async fn remove_restriction(&self, item: &ItemId, layer: Layer) -> Result<MutationReport> {
        self.remove_source(Priority::new(Tier::Restriction, layer), item.clone())
            .await
    }

    /// Activates a restraint set's base at layer `0`.
    pub async fn add_restraint_set(
        &self,
        set: &RestraintSet,
        enabler: impl Into<String>,
    ) -> Result<MutationReport> {
        let key = CombinedKey::new(
            Tier::RestraintSet,
            RestraintSet::BASE_LAYER,
            enabler,
            set.label.clone(),
        );
        let (id, contributions) = (set.id.clone(), set.base_contributions());
        self.commit(move |batch, registry| {
            batch.stage_add(registry, key, id, contributions);
        })
        .await
    }

    /// Deactivates a restraint set's base along with any of its sub-layers
    /// that are still enabled.
    pub async fn remove_restraint_set(&self, set: &ItemId) -> Result<MutationReport> {
        let set = set.clone();
        self.commit(move |batch, registry| {
            if !batch.stage_remove_set(registry, &set) {
                debug!(%set, "stale removal: restraint set is not active");
            }
        })
        .await
    }

    /// Enables the selected sub-layers of `set`. Indices the set does not
    /// define are skipped.
    pub async fn add_restraint_set_layers(
        &self,
        set: &RestraintSet,
        layers: LayerMask,
        enabler: impl Into<String>,
    ) -> Result<MutationReport> {
        let planned = plan_layers(set, layers, &enabler.into());
        self.commit(move |batch, registry| {
            for source in planned {
                batch.stage_add(registry, source.key, source.item, source.contributions);
            }
        })
        .await
    }

    pub async fn remove_restraint_set_layers(
        &self,
        set: &ItemId,
        layers: LayerMask,
    ) -> Result<MutationReport> {
        let set = set.clone();
        self.commit(move |batch, registry| {
            for source in layer_sources(layers) {
                batch.stage_remove(registry, source, Some(&set));
            }
        })
        .await
    }

    /// Disables `removed` and enables `added` as one batch, so every aspect
    /// recomputes once against the final set of layers.
    pub async fn swap_restraint_set_layers(
        &self,
        set: &RestraintSet,
        removed: LayerMask,
        added: LayerMask,
        enabler: impl Into<String>,
    ) -> Result<MutationReport> {
        let id = set.id.clone();
        let planned = plan_layers(set, added, &enabler.into());
        self.commit(move |batch, registry| {
            for source in layer_sources(removed) {
                batch.stage_remove(registry, source, Some(&id));
            }
            for source in planned {
                batch.stage_add(registry, source.key, source.item, source.contributions);
            }
        })
        .await
    }

    /// Rebuilds the cache from an authoritative snapshot.
    ///
    /// Sources in the snapshot are (re-)added in tier order, registered
    /// sources absent from it are removed, and every aspect runs one cycle.
    pub async fn sync_from_snapshot(&self, snapshot: &CacheSnapshot) -> Result<MutationReport> {
        let catalog = self.catalog.as_ref().ok_or(RuntimeError::MissingCatalog)?;
        let planned = plan_snapshot(catalog.as_ref(), snapshot);
        info!(
            entries = snapshot.len(),
            resolved = planned.len(),
            "syncing from snapshot"
        );

        self.commit(move |batch, registry| {
            let stale: Vec<SourceId> = registry
                .sources()
                .filter(|source| !planned.iter().any(|p| p.key.source() == **source))
                .copied()
                .collect();
            for source in stale {
                batch.stage_remove(registry, source, None);
            }
            for source in planned {
                batch.stage_add(registry, source.key, source.item, source.contributions);
            }
            batch.touch_all();
        })
        .await
    }

    /// Empties every store and the registry, reverting the host to its
    /// unrestricted state.
    pub async fn clear_all(&self) -> Result<MutationReport> {
        let pending = {
            let mut registry = self.registry.lock().await;
            registry.clear();
            self.channels.clear_all().await?
        };
        let aspects = join_cycles(pending).await?;
        info!("cache cleared");
        Ok(MutationReport { aspects })
    }

    /// Resolved view of every aspect at one consistent point in the dispatch
    /// order.
    pub async fn resolved_state(&self) -> Result<ResolvedState> {
        let (equipment, meta, mods, statuses, profile, overlay, traits, intensity) = {
            let _registry = self.registry.lock().await;
            (
                self.channels.equipment.inspect().await?,
                self.channels.meta.inspect().await?,
                self.channels.mods.inspect().await?,
                self.channels.statuses.inspect().await?,
                self.channels.profile.inspect().await?,
                self.channels.overlay.inspect().await?,
                self.channels.traits.inspect().await?,
                self.channels.intensity.inspect().await?,
            )
        };

        let mut counts = BTreeMap::new();
        Ok(ResolvedState {
            equipment: collect(&mut counts, AspectKind::Equipment, equipment).await?,
            meta: collect(&mut counts, AspectKind::Meta, meta).await?,
            mods: collect(&mut counts, AspectKind::Mod, mods).await?,
            statuses: collect(&mut counts, AspectKind::Status, statuses).await?,
            profile: collect(&mut counts, AspectKind::Profile, profile).await?,
            overlays: collect(&mut counts, AspectKind::Overlay, overlay).await?,
            traits: collect(&mut counts, AspectKind::Traits, traits).await?,
            intensity: collect(&mut counts, AspectKind::Intensity, intensity).await?,
            contributions: counts,
        })
    }

    /// Sources currently registered, in priority order.
    pub async fn active_sources(&self) -> Vec<ActiveSource> {
        self.registry.lock().await.entries().cloned().collect()
    }

    async fn remove_source(&self, source: SourceId, item: ItemId) -> Result<MutationReport> {
        self.commit(move |batch, registry| {
            batch.stage_remove(registry, source, Some(&item));
        })
        .await
    }

    /// Stages under the dispatch lock, enqueues, releases, then joins.
    async fn commit<F>(&self, stage: F) -> Result<MutationReport>
    where
        F: FnOnce(&mut Batch, &mut SourceRegistry) + Send,
    {
        let pending = {
            let mut registry = self.registry.lock().await;
            let mut batch = Batch::default();
            stage(&mut batch, &mut *registry);
            if batch.touched().is_empty() {
                return Ok(MutationReport::default());
            }
            batch.dispatch(&self.channels).await?
        };
        let aspects = join_cycles(pending).await?;
        Ok(MutationReport { aspects })
    }
}

async fn collect<V>(
    counts: &mut BTreeMap<AspectKind, usize>,
    aspect: AspectKind,
    reply_rx: oneshot::Receiver<AspectView<V>>,
) -> Result<V> {
    let AspectView {
        view,
        contributions,
    } = wait_view(aspect, reply_rx).await?;
    counts.insert(aspect, contributions);
    Ok(view)
}

fn plan_layers(set: &RestraintSet, layers: LayerMask, enabler: &str) -> Vec<PlannedSource> {
    layers
        .indices()
        .filter_map(|index| {
            let layer = match set.layer(index) {
                Ok(layer) => layer,
                Err(err) => {
                    warn!(%err, "skipping restraint layer");
                    return None;
                }
            };
            Some(PlannedSource {
                key: CombinedKey::new(
                    Tier::RestraintSet,
                    RestraintSet::cache_layer(index)?,
                    enabler,
                    set.layer_label(index),
                ),
                item: set.id.clone(),
                contributions: ContributionSet::from_effects(&layer.effects),
            })
        })
        .collect()
}

/// Slots of the selected sub-layers.
fn layer_sources(layers: LayerMask) -> impl Iterator<Item = SourceId> {
    layers
        .indices()
        .filter_map(RestraintSet::cache_layer)
        .map(|layer| Priority::new(Tier::RestraintSet, layer))
}

/// Resolves snapshot entries against the catalog in tier order.
fn plan_snapshot(catalog: &dyn ItemCatalog, snapshot: &CacheSnapshot) -> Vec<PlannedSource> {
    let mut planned = Vec::with_capacity(snapshot.len());

    for entry in &snapshot.restraints {
        let Some(set) = lookup(Tier::RestraintSet, entry, |id| catalog.restraint_set(id)) else {
            continue;
        };
        if entry.layer == RestraintSet::BASE_LAYER {
            planned.push(PlannedSource {
                key: CombinedKey::new(
                    Tier::RestraintSet,
                    RestraintSet::BASE_LAYER,
                    entry.enabler.clone(),
                    set.label.clone(),
                ),
                item: set.id.clone(),
                contributions: set.base_contributions(),
            });
        } else {
            let index = usize::from(entry.layer - 1);
            match LayerMask::from_index(index) {
                Some(mask) => planned.extend(plan_layers(&set, mask, &entry.enabler)),
                None => warn!(
                    set = %set.id,
                    layer = entry.layer,
                    "skipping snapshot entry: layer out of range"
                ),
            }
        }
    }

    for entry in &snapshot.restrictions {
        if let Some(item) = lookup(Tier::Restriction, entry, |id| catalog.restriction(id)) {
            planned.push(PlannedSource {
                key: CombinedKey::new(
                    Tier::Restriction,
                    entry.layer,
                    entry.enabler.clone(),
                    item.label.clone(),
                ),
                item: item.id.clone(),
                contributions: item.contributions(),
            });
        }
    }

    for entry in &snapshot.gags {
        if let Some(item) = lookup(Tier::Gag, entry, |id| catalog.gag(id)) {
            planned.push(PlannedSource {
                key: CombinedKey::new(
                    Tier::Gag,
                    entry.layer,
                    entry.enabler.clone(),
                    item.label.clone(),
                ),
                item: item.id.clone(),
                contributions: item.contributions(),
            });
        }
    }

    planned
}

fn lookup<T>(
    tier: Tier,
    entry: &SnapshotEntry,
    find: impl FnOnce(&ItemId) -> Option<T>,
) -> Option<T> {
    let found = find(&entry.item);
    if found.is_none() {
        warn!(
            %tier,
            item = %entry.item,
            layer = entry.layer,
            "skipping snapshot entry: unknown item"
        );
    }
    found
}
