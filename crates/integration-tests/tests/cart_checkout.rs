//! Integration tests for checkout.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use valoisa_integration_tests::Fixture;
use valoisa_storefront::cart::{CheckoutCancelled, CheckoutRejection};
use valoisa_storefront::catalog::featured_product;
use valoisa_storefront::notify::NotificationKind;
use valoisa_storefront::storage::{KeyValueStore, MemoryStore, keys};
use valoisa_storefront::{CartSettings, CheckoutOutcome, RestoreOutcome};

fn settings(delay_ms: u64) -> CartSettings {
    CartSettings {
        checkout_delay: Duration::from_millis(delay_ms),
        ..CartSettings::default()
    }
}

#[tokio::test]
async fn test_checkout_on_empty_cart_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let mut page = Fixture::new(settings(10), store.clone());

    let outcome = page.manager.checkout();
    assert!(matches!(
        outcome,
        CheckoutOutcome::Rejected(CheckoutRejection::EmptyCart)
    ));
    assert!(!outcome.is_accepted());
    assert!(page.manager.is_empty());
    assert!(store.get(keys::CART).unwrap().is_none());

    let sent = page.notifier.sent();
    let last = sent.last().unwrap();
    assert_eq!(last.kind, NotificationKind::Error);
    assert_eq!(last.title, "Error");
}

#[tokio::test]
async fn test_checkout_empties_cart_then_resets_view() {
    let store = Arc::new(MemoryStore::new());
    let mut page = Fixture::new(settings(20), store.clone());
    let _ = page.manager.add_item(featured_product());
    let _ = page.manager.add_item(featured_product());
    page.manager.set_shipping_waived(true);

    let CheckoutOutcome::Accepted(pending) = page.manager.checkout() else {
        panic!("non-empty cart must be accepted");
    };

    // Cleared and mirrored before the delay elapses.
    assert!(page.manager.is_empty());
    assert_eq!(store.get(keys::CART).unwrap().as_deref(), Some("[]"));
    assert!(page.renderer.last().unwrap().is_empty);
    assert_eq!(page.renderer.reset_count(), 0);

    let receipt = pending.completed().await.unwrap();
    assert_eq!(receipt.item_count, 2);
    assert_eq!(receipt.grand_total, Decimal::new(1000, 2));
    assert!(receipt.shipping_waived);
    assert_eq!(page.renderer.reset_count(), 1);

    let messages: Vec<String> = page
        .notifier
        .sent()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert!(messages.contains(&"Proceeding to checkout".to_string()));

    // A reload after checkout sees an empty cart, and adding works again.
    let mut reloaded = Fixture::new(settings(20), store);
    assert_eq!(reloaded.manager.restore(), RestoreOutcome::Restored(0));
    let _ = reloaded.manager.add_item(featured_product());
    assert_eq!(reloaded.manager.items().len(), 1);
}

#[tokio::test]
async fn test_dropping_pending_checkout_cancels_reset() {
    let store = Arc::new(MemoryStore::new());
    let mut page = Fixture::new(settings(30), store);
    let _ = page.manager.add_item(featured_product());

    let outcome = page.manager.checkout();
    assert!(outcome.is_accepted());
    drop(outcome);

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(page.renderer.reset_count(), 0);
    // Clearing is not undone by cancelling the reset.
    assert!(page.manager.is_empty());
}

#[tokio::test]
async fn test_leaving_mid_delay_does_not_restore_cart() {
    let store = Arc::new(MemoryStore::new());
    let mut page = Fixture::new(settings(500), store.clone());
    let _ = page.manager.add_item(featured_product());

    let outcome = page.manager.checkout();
    assert!(outcome.is_accepted());
    drop(page);
    drop(outcome);

    let mut reloaded = Fixture::new(settings(500), store);
    assert_eq!(reloaded.manager.restore(), RestoreOutcome::Restored(0));
    assert!(reloaded.manager.is_empty());
    assert_eq!(reloaded.renderer.reset_count(), 0);
}

#[tokio::test]
async fn test_checkout_reports_unsaved_clear() {
    let store = Arc::new(MemoryStore::new());
    let mut page = Fixture::new(settings(10), store.clone());
    let _ = page.manager.add_item(featured_product());
    store.set_disabled(true);

    let CheckoutOutcome::Accepted(pending) = page.manager.checkout() else {
        panic!("non-empty cart must be accepted");
    };
    assert!(pending.storage_failed());
    assert!(page.manager.is_empty());
    pending.cancel();

    // The stored cart was never cleared, so a reload brings the item back.
    store.set_disabled(false);
    let mut reloaded = Fixture::new(settings(10), store);
    assert_eq!(reloaded.manager.restore(), RestoreOutcome::Restored(1));
}

#[test]
fn test_checkout_without_runtime_is_rejected_untouched() {
    let store = Arc::new(MemoryStore::new());
    let mut page = Fixture::new(settings(10), store.clone());
    let _ = page.manager.add_item(featured_product());
    let before = store.get(keys::CART).unwrap();

    let outcome = page.manager.checkout();
    assert!(matches!(
        outcome,
        CheckoutOutcome::Rejected(CheckoutRejection::NoRuntime)
    ));
    assert_eq!(page.manager.items().len(), 1);
    assert_eq!(store.get(keys::CART).unwrap(), before);
    assert_eq!(page.renderer.reset_count(), 0);
}

#[tokio::test]
async fn test_completed_after_task_finished_still_yields_receipt() {
    let store = Arc::new(MemoryStore::new());
    let mut page = Fixture::new(settings(0), store);
    let _ = page.manager.add_item(featured_product());

    let CheckoutOutcome::Accepted(pending) = page.manager.checkout() else {
        panic!("non-empty cart must be accepted");
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(pending.is_finished());

    let reference = pending.receipt().reference;
    let receipt = pending.completed().await.unwrap();
    assert_eq!(receipt.reference, reference);
    assert_eq!(page.renderer.reset_count(), 1);
}

#[test]
fn test_cancelled_error_message() {
    assert_eq!(
        CheckoutCancelled.to_string(),
        "checkout completion was cancelled"
    );
}
