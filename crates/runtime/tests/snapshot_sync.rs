//! Cold rebuilds from an authoritative snapshot.
mod common;

use cache_core::{AspectMask, EquipSlot, GlamourItem, Intensity, ItemEffects, ItemId, Tier};
use runtime::{CacheOrchestrator, CacheSnapshot, RuntimeError, SnapshotEntry, StaticCatalog};

use common::{HAT_A, HAT_B, gag, head, restraint_set, restriction, start, start_with};

const STRAPS: GlamourItem = GlamourItem::new(3003, 1);

fn catalog() -> StaticCatalog {
    let mut catalog = StaticCatalog::new();
    catalog.add_restraint_set(
        restraint_set("harness", head(HAT_A)).with_layer(
            "Straps",
            ItemEffects::default().with_glamour(EquipSlot::Legs, STRAPS),
        ),
    );
    catalog.add_restriction(restriction(
        "cuffs",
        ItemEffects::default().with_intensity(Intensity(4)),
    ));
    catalog.add_restraint_set(restraint_set("straitjacket", head(HAT_B)));
    catalog.add_gag(gag("ball", head(HAT_B)));
    catalog
}

fn full_snapshot() -> CacheSnapshot {
    CacheSnapshot {
        gags: vec![
            SnapshotEntry::new(0, "ball", "mistress"),
            SnapshotEntry::new(1, "missing", "mistress"),
        ],
        restrictions: vec![SnapshotEntry::new(0, "cuffs", "mistress")],
        restraints: vec![
            SnapshotEntry::new(0, "harness", "mistress"),
            SnapshotEntry::new(1, "harness", "mistress"),
        ],
    }
}

#[tokio::test]
async fn test_sync_rebuilds_every_tier() {
    let (_orchestrator, handle, _applier) =
        start_with(CacheOrchestrator::builder().catalog(catalog())).await;

    let report = handle.sync_from_snapshot(&full_snapshot()).await.unwrap();
    assert_eq!(report.touched(), AspectMask::all());

    let sources = handle.active_sources().await;
    let slots: Vec<_> = sources.iter().map(|s| (s.key.tier, s.key.layer)).collect();
    assert_eq!(
        slots,
        vec![
            (Tier::RestraintSet, 0),
            (Tier::RestraintSet, 1),
            (Tier::Restriction, 0),
            (Tier::Gag, 0),
        ]
    );

    let state = handle.resolved_state().await.unwrap();
    assert_eq!(state.equipment.get(&EquipSlot::Head), Some(&HAT_B));
    assert_eq!(state.equipment.get(&EquipSlot::Legs), Some(&STRAPS));
    assert_eq!(state.intensity, Intensity(4));
}

#[tokio::test]
async fn test_sync_then_clear_empties_everything() {
    let (_orchestrator, handle, _applier) =
        start_with(CacheOrchestrator::builder().catalog(catalog())).await;

    handle.sync_from_snapshot(&full_snapshot()).await.unwrap();
    handle.clear_all().await.unwrap();

    let state = handle.resolved_state().await.unwrap();
    assert!(state.is_empty());
    assert_eq!(state.total_contributions(), 0);
    assert!(handle.active_sources().await.is_empty());
}

#[tokio::test]
async fn test_sync_drops_sources_missing_from_snapshot() {
    let (_orchestrator, handle, applier) =
        start_with(CacheOrchestrator::builder().catalog(catalog())).await;
    handle.add_gag(&gag("ball", head(HAT_B)), 0, "mistress").await.unwrap();
    applier.take_calls();

    let snapshot = CacheSnapshot {
        restrictions: vec![SnapshotEntry::new(0, "cuffs", "mistress")],
        ..CacheSnapshot::default()
    };
    handle.sync_from_snapshot(&snapshot).await.unwrap();

    let sources = handle.active_sources().await;
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].item, ItemId::new("cuffs"));
    let state = handle.resolved_state().await.unwrap();
    assert!(state.equipment.is_empty());
    let cleared = common::Call::ClearSlot(EquipSlot::Head);
    assert!(applier.calls().contains(&cleared));
}

#[tokio::test]
async fn test_sync_to_another_set_drops_previous_layers() {
    let (_orchestrator, handle, _applier) =
        start_with(CacheOrchestrator::builder().catalog(catalog())).await;
    handle.sync_from_snapshot(&full_snapshot()).await.unwrap();

    let snapshot = CacheSnapshot {
        restraints: vec![SnapshotEntry::new(0, "straitjacket", "mistress")],
        ..CacheSnapshot::default()
    };
    handle.sync_from_snapshot(&snapshot).await.unwrap();

    let sources = handle.active_sources().await;
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].item, ItemId::new("straitjacket"));
    let state = handle.resolved_state().await.unwrap();
    assert_eq!(state.equipment.get(&EquipSlot::Legs), None);
    assert_eq!(state.equipment.get(&EquipSlot::Head), Some(&HAT_B));
}

#[tokio::test]
async fn test_repeated_sync_applies_nothing_new() {
    let (_orchestrator, handle, _applier) =
        start_with(CacheOrchestrator::builder().catalog(catalog())).await;

    handle.sync_from_snapshot(&full_snapshot()).await.unwrap();
    let before = handle.resolved_state().await.unwrap();
    let report = handle.sync_from_snapshot(&full_snapshot()).await.unwrap();

    assert_eq!(report.applied(), 0);
    assert_eq!(handle.resolved_state().await.unwrap(), before);
}

#[tokio::test]
async fn test_sync_skips_invalid_entries() {
    let (_orchestrator, handle, _applier) =
        start_with(CacheOrchestrator::builder().catalog(catalog())).await;
    let snapshot: CacheSnapshot = serde_json::from_str(
        r#"{
            "restraints": [ { "layer": 6, "item": "harness", "enabler": "mistress" } ],
            "gags": [ { "layer": 0, "item": "unknown", "enabler": "mistress" } ]
        }"#,
    )
    .unwrap();

    let report = handle.sync_from_snapshot(&snapshot).await.unwrap();
    assert_eq!(report.failures(), 0);
    assert!(handle.active_sources().await.is_empty());
}

#[tokio::test]
async fn test_sync_requires_catalog() {
    let (_orchestrator, handle, _applier) = start().await;
    let result = handle.sync_from_snapshot(&full_snapshot()).await;
    assert!(matches!(result, Err(RuntimeError::MissingCatalog)));
}
