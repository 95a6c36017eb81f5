//! Concurrent callers against one orchestrator.
mod common;

use cache_core::{EquipSlot, GlamourItem, ItemId, StatusId};

use common::{Call, head, restriction, start};

fn item_for(layer: u8) -> GlamourItem {
    GlamourItem::new(100 + u32::from(layer), 0)
}

fn last_head_call(calls: &[Call]) -> Option<Call> {
    calls
        .iter()
        .rev()
        .find(|call| {
            matches!(
                call,
                Call::ApplySlot(EquipSlot::Head, _) | Call::ClearSlot(EquipSlot::Head)
            )
        })
        .cloned()
}

/// Concurrent adds and removes on distinct keys end with the host holding
/// exactly the resolved state.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mutations_converge() {
    let (_orchestrator, handle, applier) = start().await;

    let mut tasks = Vec::new();
    for layer in 0..16u8 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            let item = restriction(
                &format!("r{layer}"),
                head(item_for(layer)).with_status(StatusId(u32::from(layer))),
            );
            handle.add_restriction(&item, layer, "tester").await
        }));
    }
    for task in tasks {
        task.await.expect("task should not panic").expect("add should succeed");
    }

    let state = handle.resolved_state().await.unwrap();
    assert_eq!(state.equipment.get(&EquipSlot::Head), Some(&item_for(15)));
    assert_eq!(state.statuses.len(), 16);
    let last_head = last_head_call(&applier.calls());
    assert_eq!(
        last_head,
        Some(Call::ApplySlot(EquipSlot::Head, item_for(15)))
    );

    let mut tasks = Vec::new();
    for layer in (0..16u8).rev() {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            handle
                .remove_restriction(&ItemId::new(format!("r{layer}")), layer)
                .await
        }));
    }
    for task in tasks {
        task.await.expect("task should not panic").expect("remove should succeed");
    }

    let state = handle.resolved_state().await.unwrap();
    assert!(state.is_empty());
    assert!(handle.active_sources().await.is_empty());
    let last_head = last_head_call(&applier.calls());
    assert_eq!(last_head, Some(Call::ClearSlot(EquipSlot::Head)));
}

/// Lock and unlock of the same source issued back to back apply in order.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_key_operations_keep_issue_order() {
    let (_orchestrator, handle, _applier) = start().await;
    let item = restriction("cuffs", head(item_for(1)));

    for _ in 0..20 {
        handle.add_restriction(&item, 1, "tester").await.unwrap();
        handle.remove_restriction(&item.id, 1).await.unwrap();
    }
    handle.add_restriction(&item, 1, "tester").await.unwrap();

    let state = handle.resolved_state().await.unwrap();
    assert_eq!(state.equipment.get(&EquipSlot::Head), Some(&item_for(1)));
    assert_eq!(handle.active_sources().await.len(), 1);
}
