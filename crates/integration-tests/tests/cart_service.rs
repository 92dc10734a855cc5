//! Integration tests for the optimistic cart service.
//!
//! These drive the service against the in-process recording backend:
//! optimistic visibility, debounced dispatch, resync-on-failure, the
//! two-phase removal flow, and the badge side channel.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use rust_decimal::Decimal;

use ongil_core::CartId;
use ongil_integration_tests::{BackendCall, RecordingBackend, cart_line, init_tracing};
use ongil_storefront::api::{ApiError, MutationOutcome};
use ongil_storefront::cart::{BadgeStore, CartError, CartService};

const DEBOUNCE: Duration = Duration::from_millis(500);

async fn hydrated_service(backend: &RecordingBackend) -> CartService<RecordingBackend> {
    init_tracing();
    let service = CartService::new(backend.clone(), BadgeStore::new(), DEBOUNCE);
    service.hydrate().await.unwrap();
    service
}

fn resync_count(backend: &RecordingBackend) -> usize {
    // Subtract the fetch done by hydrate itself
    backend.count_calls(|call| matches!(call, BackendCall::FetchCart)) - 1
}

// =============================================================================
// Optimistic Quantity Edits
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_quantity_edit_is_visible_before_dispatch_settles() {
    let backend = RecordingBackend::with_cart(vec![cart_line(1, 1000, 2)]);
    let service = hydrated_service(&backend).await;

    let dispatch = service.handle_quantity(CartId::new(1), 5);

    // Synchronously, before the future has been polled at all
    let line = service.line(CartId::new(1)).unwrap();
    assert_eq!(line.quantity, 5);
    assert_eq!(line.total_price.amount, Decimal::from(5000));

    dispatch.await.unwrap();

    let updates = backend.count_calls(|call| {
        matches!(call, BackendCall::UpdateLine { update, .. } if update.quantity == Some(5))
    });
    assert_eq!(updates, 1);
    assert_eq!(resync_count(&backend), 0);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_quantity_edit_triggers_exactly_one_resync() {
    let backend = RecordingBackend::with_cart(vec![cart_line(1, 1000, 2)]);
    let service = hydrated_service(&backend).await;
    backend.script_mutation(Ok(MutationOutcome::rejected("재고가 부족합니다.")));

    let err = service.handle_quantity(CartId::new(1), 5).await.unwrap_err();

    assert!(matches!(err, CartError::Rejected(Some(_))));
    assert_eq!(resync_count(&backend), 1);

    // Server truth replaced the optimistic overlay
    let line = service.line(CartId::new(1)).unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.total_price.amount, Decimal::from(2000));
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_also_triggers_one_resync() {
    let backend = RecordingBackend::with_cart(vec![cart_line(1, 1000, 2)]);
    let service = hydrated_service(&backend).await;
    backend.script_mutation(Err(ApiError::Status {
        status: 502,
        body: "bad gateway".to_string(),
    }));

    let err = service.handle_quantity(CartId::new(1), 3).await.unwrap_err();

    assert!(matches!(err, CartError::Backend(_)));
    assert_eq!(resync_count(&backend), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_dispatch_only_the_latest() {
    let backend = RecordingBackend::with_cart(vec![cart_line(1, 1000, 2)]);
    let service = hydrated_service(&backend).await;

    // Two edits inside one debounce window; each updates the UI at once
    let first = service.handle_quantity(CartId::new(1), 3);
    let second = service.handle_quantity(CartId::new(1), 4);
    assert_eq!(service.line(CartId::new(1)).unwrap().quantity, 4);

    first.await.unwrap();
    second.await.unwrap();

    let updates: Vec<_> = backend
        .calls()
        .into_iter()
        .filter(|call| matches!(call, BackendCall::UpdateLine { .. }))
        .collect();
    assert_eq!(updates.len(), 1);
    assert!(
        matches!(&updates[0], BackendCall::UpdateLine { update, .. } if update.quantity == Some(4))
    );
}

#[tokio::test(start_paused = true)]
async fn test_edit_for_removed_line_is_dropped() {
    let backend = RecordingBackend::with_cart(vec![cart_line(1, 1000, 2), cart_line(2, 2000, 1)]);
    let service = hydrated_service(&backend).await;

    let dispatch = service.handle_quantity(CartId::new(1), 5);
    service.request_remove(CartId::new(1)).unwrap();
    service.confirm_pending().await.unwrap();

    // The debounced edit wakes up to find its line gone
    dispatch.await.unwrap();

    assert_eq!(
        backend.count_calls(|call| matches!(call, BackendCall::UpdateLine { .. })),
        0
    );
}

#[tokio::test]
async fn test_zero_quantity_is_rejected_without_network() {
    let backend = RecordingBackend::with_cart(vec![cart_line(1, 1000, 2)]);
    let service = hydrated_service(&backend).await;

    let err = service.handle_quantity(CartId::new(1), 0).await.unwrap_err();

    assert!(matches!(err, CartError::Validation(_)));
    assert_eq!(service.line(CartId::new(1)).unwrap().quantity, 2);
    assert_eq!(
        backend.count_calls(|call| matches!(call, BackendCall::UpdateLine { .. })),
        0
    );
}

// =============================================================================
// Option Changes
// =============================================================================

#[tokio::test]
async fn test_option_change_applies_locally_and_dispatches() {
    let backend = RecordingBackend::with_cart(vec![cart_line(1, 1000, 2)]);
    let service = hydrated_service(&backend).await;

    let dispatch = service.handle_option_change(CartId::new(1), "navy", "XL");

    let line = service.line(CartId::new(1)).unwrap();
    assert_eq!(line.selected_color, "navy");
    assert_eq!(line.selected_size, "XL");

    dispatch.await.unwrap();

    let updates = backend.count_calls(|call| {
        matches!(
            call,
            BackendCall::UpdateLine { update, .. }
                if update.selected_color.as_deref() == Some("navy")
                    && update.selected_size.as_deref() == Some("XL")
        )
    });
    assert_eq!(updates, 1);
}

#[tokio::test]
async fn test_failed_option_change_resyncs() {
    let backend = RecordingBackend::with_cart(vec![cart_line(1, 1000, 2)]);
    let service = hydrated_service(&backend).await;
    backend.script_mutation(Ok(MutationOutcome::rejected("품절된 옵션입니다.")));

    let err = service
        .handle_option_change(CartId::new(1), "navy", "XL")
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::Rejected(Some(_))));
    assert_eq!(resync_count(&backend), 1);
    assert_eq!(service.line(CartId::new(1)).unwrap().selected_color, "black");
}

// =============================================================================
// Two-Phase Removal
// =============================================================================

#[tokio::test]
async fn test_single_removal_flow_updates_badge() {
    let backend = RecordingBackend::with_cart(vec![cart_line(1, 1000, 1), cart_line(2, 2000, 1)]);
    let service = hydrated_service(&backend).await;
    assert_eq!(service.badge().count(), 2);

    service.request_remove(CartId::new(1)).unwrap();
    service.confirm_pending().await.unwrap();

    assert_eq!(
        service.lines().iter().map(|line| line.id).collect::<Vec<_>>(),
        vec![CartId::new(2)]
    );
    assert_eq!(
        backend.count_calls(|call| matches!(call, BackendCall::RemoveLine(_))),
        1
    );
    // Side channel: the badge was refreshed after the successful delete
    assert_eq!(service.badge().count(), 1);
}

#[tokio::test]
async fn test_bulk_removal_of_selected_lines() {
    let backend = RecordingBackend::with_cart(vec![
        cart_line(1, 1000, 1),
        cart_line(2, 2000, 1),
        cart_line(3, 3000, 1),
        cart_line(4, 4000, 1),
    ]);
    let service = hydrated_service(&backend).await;

    // Everything was selected at hydration; spare line 4
    service.toggle_selection(CartId::new(4));
    service.request_remove_selected().unwrap();
    service.confirm_pending().await.unwrap();

    assert_eq!(
        service.lines().iter().map(|line| line.id).collect::<Vec<_>>(),
        vec![CartId::new(4)]
    );
    assert_eq!(
        backend.count_calls(|call| {
            matches!(
                call,
                BackendCall::RemoveLines(ids)
                    if *ids == vec![CartId::new(1), CartId::new(2), CartId::new(3)]
            )
        }),
        1
    );
    // Selection was reconciled against the shrunken snapshot
    assert!(service.selected_ids().is_empty());
}

#[tokio::test]
async fn test_failed_removal_restores_server_truth() {
    let backend = RecordingBackend::with_cart(vec![cart_line(1, 1000, 1), cart_line(2, 2000, 1)]);
    let service = hydrated_service(&backend).await;
    backend.script_mutation(Err(ApiError::Status {
        status: 500,
        body: "boom".to_string(),
    }));

    service.request_remove(CartId::new(1)).unwrap();
    let err = service.confirm_pending().await.unwrap_err();

    assert!(matches!(err, CartError::Backend(_)));
    assert_eq!(resync_count(&backend), 1);
    // Both lines are back, and the selection is still a subset of them
    assert_eq!(service.lines().len(), 2);
    for id in service.selected_ids() {
        assert!(service.line(id).is_some());
    }
    // The badge was not refreshed for a failed delete
    assert_eq!(
        backend.count_calls(|call| matches!(call, BackendCall::FetchCartCount)),
        1 // hydrate only
    );
}
