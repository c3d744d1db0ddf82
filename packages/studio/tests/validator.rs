//! Debounced availability checks under out-of-order responses

mod common;

use common::{landing, GatedStore};
use pagesmith_common::PageStatus;
use pagesmith_studio::{AsyncValidator, AvailabilityState, PageStore, ValidatedField};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const DEBOUNCE: Duration = Duration::from_millis(500);

fn taken_store() -> Arc<GatedStore> {
    let store = Arc::new(GatedStore::with_pages([landing(
        "Existing",
        "taken-slug",
        PageStatus::Published,
    )]));
    store.delay_slug("slow-slug", Duration::from_secs(2));
    store
}

fn slug_validator(store: &Arc<GatedStore>) -> AsyncValidator {
    let store: Arc<dyn PageStore> = store.clone();
    AsyncValidator::new(ValidatedField::Slug, store, DEBOUNCE)
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_cannot_overwrite_newer_verdict() {
    let store = taken_store();
    let validator = Arc::new(slug_validator(&store));

    let slow = tokio::spawn({
        let validator = validator.clone();
        async move { validator.validate("slow-slug").await }
    });

    // let the first request clear its debounce and start the slow query
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(validator.state(), AvailabilityState::Checking);

    let fresh = validator.validate("taken-slug").await;
    assert!(matches!(fresh, AvailabilityState::Unavailable { .. }));

    // the slow "available" answer arrives last and is dropped
    let late = slow.await.unwrap();
    assert!(matches!(late, AvailabilityState::Unavailable { .. }));
    assert!(matches!(
        validator.state(),
        AvailabilityState::Unavailable { .. }
    ));
    assert_eq!(store.slug_check_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_rescheduling_replaces_pending_check() {
    let store = taken_store();
    let validator = slug_validator(&store);

    validator.schedule("slow-slug");
    tokio::time::sleep(Duration::from_millis(600)).await;
    validator.schedule("taken-slug");

    assert!(matches!(
        validator.settle().await,
        AvailabilityState::Unavailable { .. }
    ));
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(matches!(
        validator.state(),
        AvailabilityState::Unavailable { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_keystrokes_inside_debounce_issue_one_query() {
    let store = taken_store();
    let validator = slug_validator(&store);

    for typed in ["sprin", "spring", "spring-", "spring-m", "spring-menu"] {
        validator.schedule(typed);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert_eq!(validator.settle().await, AvailabilityState::Available);
    assert_eq!(store.slug_check_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_format_failure_is_immediate_and_offline() {
    let store = taken_store();
    let validator = slug_validator(&store);

    validator.schedule("valid-slug");
    let state = validator.validate("--bad--").await;
    assert!(matches!(state, AvailabilityState::Unavailable { .. }));

    // the earlier scheduled check was superseded before reaching the store
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(validator.state(), state);
    assert_eq!(store.slug_check_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_fails_open_with_advisory() {
    let store = taken_store();
    store.fail_checks.store(true, Ordering::SeqCst);
    let validator = slug_validator(&store);

    match validator.validate("spring-menu").await {
        AvailabilityState::Idle { advisory } => assert!(advisory.is_some()),
        other => panic!("expected idle with advisory, got {:?}", other),
    }

    // the authoritative check does not fail open
    assert!(validator.confirm("spring-menu").await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_current_document_does_not_collide_with_itself() {
    let store = taken_store();
    let own_id = store.inner.pages().unwrap()[0].id.clone();
    let validator = slug_validator(&store);

    assert!(matches!(
        validator.validate("taken-slug").await,
        AvailabilityState::Unavailable { .. }
    ));

    validator.set_exclude(own_id);
    assert_eq!(
        validator.validate("taken-slug").await,
        AvailabilityState::Available
    );
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_final_verdict() {
    let store = taken_store();
    store.delay_slug("spring-menu", Duration::from_millis(100));
    let validator = slug_validator(&store);
    let mut updates = validator.subscribe();

    validator.schedule("spring-menu");
    updates.changed().await.unwrap();
    assert_eq!(*updates.borrow_and_update(), AvailabilityState::Checking);
    updates.changed().await.unwrap();
    assert_eq!(*updates.borrow(), AvailabilityState::Available);
}
