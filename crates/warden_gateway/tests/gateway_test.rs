//! Tests for allow-list operations and command dispatch.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use warden_core::{ChannelId, Entry, RejectReason, RemoveOutcome, UpsertOutcome, UserId};
use warden_gateway::{Caller, Gateway, GatewaySettingsBuilder, Request, Response};
use warden_security::{PauseState, PermissionConfig, SecurityErrorKind};
use warden_store::InMemoryStore;

const CHANNEL: ChannelId = ChannelId(100);
const OWNER: UserId = UserId(1);
const MEMBER: UserId = UserId(2);

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn gateway_with(entries: Vec<Entry>) -> (InMemoryStore, Gateway<InMemoryStore>) {
    let store = InMemoryStore::with_entries(entries);
    let settings = GatewaySettingsBuilder::default()
        .permissions(PermissionConfig::new(CHANNEL, [OWNER]))
        .build()
        .unwrap();
    (store.clone(), Gateway::new(store, settings))
}

fn add(uid: &str, year: i64, month: i64, day: i64, comment: &str) -> Request {
    Request::AddUid {
        uid: uid.into(),
        year,
        month,
        day,
        comment: comment.into(),
    }
}

#[tokio::test]
async fn test_upsert_then_lookup_round_trips() {
    let (_store, gateway) = gateway_with(vec![]);

    let outcome = gateway.upsert("abc123", date(2025, 1, 1), "test").await;
    let expected = Entry::new("abc123", date(2025, 1, 1), "test");

    assert_eq!(outcome, UpsertOutcome::Added(expected.clone()));
    assert_eq!(gateway.lookup("abc123").await, Some(expected));
}

#[tokio::test]
async fn test_second_upsert_updates_in_place() {
    let (store, gateway) = gateway_with(vec![]);

    gateway.upsert("first", date(2030, 1, 1), "").await;
    assert!(matches!(
        gateway.upsert("abc123", date(2025, 1, 1), "test").await,
        UpsertOutcome::Added(_)
    ));
    gateway.upsert("last", date(2030, 1, 1), "").await;

    let updated = Entry::new("abc123", date(2025, 6, 1), "updated");
    assert_eq!(
        gateway.upsert("abc123", date(2025, 6, 1), "updated").await,
        UpsertOutcome::Updated(updated.clone())
    );
    assert_eq!(gateway.lookup("abc123").await, Some(updated.clone()));

    let uids: Vec<_> = store.snapshot().into_iter().map(|e| e.uid).collect();
    assert_eq!(uids, vec!["first", "abc123", "last"]);
}

#[tokio::test]
async fn test_uids_are_trimmed_before_matching() {
    let (store, gateway) = gateway_with(vec![]);

    gateway.upsert("  abc123 ", date(2025, 1, 1), "").await;
    assert!(matches!(
        gateway.upsert("abc123", date(2026, 1, 1), "").await,
        UpsertOutcome::Updated(_)
    ));
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(store.snapshot()[0].uid, "abc123");
}

#[tokio::test]
async fn test_remove_absent_uid_leaves_store_untouched() {
    let (store, gateway) = gateway_with(vec![Entry::new("keep", date(2025, 1, 1), "")]);

    assert_eq!(gateway.remove("missing").await, RemoveOutcome::NotFound);
    assert_eq!(store.replace_count(), 0);
    assert_eq!(store.snapshot().len(), 1);
}

#[tokio::test]
async fn test_remove_present_uid() {
    let keep = Entry::new("keep", date(2025, 1, 1), "");
    let gone = Entry::new("gone", date(2026, 1, 1), "bye");
    let (store, gateway) = gateway_with(vec![keep.clone(), gone.clone()]);

    assert_eq!(gateway.remove(" gone ").await, RemoveOutcome::Removed(gone));
    assert_eq!(store.snapshot(), vec![keep.clone()]);
    assert_eq!(gateway.list_all().await, vec![keep]);
}

#[tokio::test]
async fn test_invalid_input_never_reaches_the_store() {
    let (store, gateway) = gateway_with(vec![]);

    let outcome = gateway.upsert("   ", date(2025, 1, 1), "").await;
    assert!(matches!(
        outcome,
        UpsertOutcome::Rejected(RejectReason::Invalid { ref field, .. }) if field == "uid"
    ));

    let outcome = gateway.upsert_parts("abc", 2025, 2, 30, "").await;
    assert!(matches!(
        outcome,
        UpsertOutcome::Rejected(RejectReason::Invalid { ref field, .. }) if field == "expiry date"
    ));

    let outcome = gateway.upsert("abc", date(1999, 12, 31), "").await;
    assert!(matches!(
        outcome,
        UpsertOutcome::Rejected(RejectReason::Invalid { ref field, .. }) if field == "year"
    ));

    assert_eq!(store.fetch_count(), 0);
    assert_eq!(store.replace_count(), 0);
}

#[tokio::test]
async fn test_failed_write_is_rejected_and_discarded() {
    let (store, gateway) = gateway_with(vec![]);
    store.set_fail_writes(true);

    assert_eq!(
        gateway.upsert("abc", date(2025, 1, 1), "").await,
        UpsertOutcome::Rejected(RejectReason::StoreWriteFailed)
    );
    assert!(store.snapshot().is_empty());
    assert_eq!(gateway.lookup("abc").await, None);
}

#[tokio::test]
async fn test_failed_fresh_read_blocks_mutations() {
    let existing = Entry::new("keep", date(2025, 1, 1), "");
    let (store, gateway) = gateway_with(vec![existing.clone()]);

    assert_eq!(gateway.list_all().await, vec![existing.clone()]);
    store.set_fail_reads(true);

    assert_eq!(
        gateway.upsert("new", date(2025, 1, 1), "").await,
        UpsertOutcome::Rejected(RejectReason::StoreReadFailed)
    );
    assert_eq!(
        gateway.remove("keep").await,
        RemoveOutcome::Rejected(RejectReason::StoreReadFailed)
    );
    assert_eq!(store.replace_count(), 0);
    assert_eq!(store.snapshot(), vec![existing]);
}

#[tokio::test(start_paused = true)]
async fn test_reads_hit_the_cache_until_ttl() {
    let (store, gateway) = gateway_with(vec![Entry::new("a", date(2025, 1, 1), "")]);

    gateway.list_all().await;
    gateway.list_all().await;
    gateway.lookup("a").await;
    assert_eq!(store.fetch_count(), 1);

    tokio::time::advance(Duration::from_secs(300)).await;
    gateway.list_all().await;
    gateway.list_all().await;
    assert_eq!(store.fetch_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reads_serve_stale_data_when_store_is_down() {
    let entry = Entry::new("a", date(2025, 1, 1), "");
    let (store, gateway) = gateway_with(vec![entry.clone()]);

    gateway.list_all().await;
    store.set_fail_reads(true);
    tokio::time::advance(Duration::from_secs(301)).await;

    assert_eq!(gateway.list_all().await, vec![entry.clone()]);
    assert_eq!(gateway.lookup("a").await, Some(entry));
}

#[tokio::test]
async fn test_reads_are_empty_when_store_never_answered() {
    let (store, gateway) = gateway_with(vec![Entry::new("a", date(2025, 1, 1), "")]);
    store.set_fail_reads(true);

    assert!(gateway.list_all().await.is_empty());
    assert_eq!(gateway.lookup("a").await, None);
}

#[tokio::test]
async fn test_pause_blocks_mutations_for_everyone() {
    let (store, gateway) = gateway_with(vec![Entry::new("a", date(2025, 1, 1), "")]);
    let owner = Caller::new(OWNER, CHANNEL);
    let member = Caller::new(MEMBER, CHANNEL);

    let response = gateway.dispatch(owner, Request::Pause).await;
    assert!(matches!(
        response,
        Response::PauseChanged {
            paused: true,
            previous: false
        }
    ));
    assert_eq!(gateway.pause_state(), PauseState::Paused);

    for (caller, request) in [
        (member, add("b", 2025, 1, 1, "")),
        (owner, add("b", 2025, 1, 1, "")),
        (owner, Request::RemoveUid { uid: "a".into() }),
    ] {
        match gateway.dispatch(caller, request).await {
            Response::Denied(e) => assert!(matches!(e.kind, SecurityErrorKind::Paused { .. })),
            other => panic!("Expected pause rejection, got {:?}", other),
        }
    }

    match gateway.dispatch(member, Request::ListUids).await {
        Response::Entries(entries) => assert_eq!(entries.len(), 1),
        other => panic!("Expected entries, got {:?}", other),
    }
    assert_eq!(store.replace_count(), 0);

    gateway.dispatch(owner, Request::Resume).await;
    match gateway.dispatch(member, add("b", 2025, 1, 1, "")).await {
        Response::Upserted(UpsertOutcome::Added(entry)) => assert_eq!(entry.uid, "b"),
        other => panic!("Expected add, got {:?}", other),
    }
}

#[test]
fn test_set_pause_returns_previous_value() {
    let (_store, gateway) = gateway_with(vec![]);

    assert!(!gateway.set_pause(true));
    assert!(gateway.set_pause(true));
    assert!(gateway.set_pause(false));
    assert!(!gateway.set_pause(false));
}

#[tokio::test]
async fn test_dispatch_enforces_channel_and_owner() {
    let (store, gateway) = gateway_with(vec![Entry::new("a", date(2025, 1, 1), "")]);

    let elsewhere = Caller::new(OWNER, ChannelId(7));
    match gateway.dispatch(elsewhere, Request::ListUids).await {
        Response::Denied(e) => assert!(matches!(e.kind, SecurityErrorKind::WrongChannel { .. })),
        other => panic!("Expected channel rejection, got {:?}", other),
    }

    let member = Caller::new(MEMBER, CHANNEL);
    for request in [Request::RemoveUid { uid: "a".into() }, Request::Pause, Request::Resume] {
        match gateway.dispatch(member, request).await {
            Response::Denied(e) => {
                assert!(matches!(e.kind, SecurityErrorKind::PermissionDenied { .. }))
            }
            other => panic!("Expected permission rejection, got {:?}", other),
        }
    }

    assert_eq!(store.fetch_count(), 0);
    assert_eq!(gateway.pause_state(), PauseState::Active);
}

#[tokio::test]
async fn test_adduid_is_rate_limited_per_user() {
    let (_store, gateway) = gateway_with(vec![]);
    let member = Caller::new(MEMBER, CHANNEL);

    for i in 0..10 {
        let response = gateway.dispatch(member, add(&format!("uid{}", i), 2025, 1, 1, "")).await;
        assert!(response.is_success(), "call {} should be admitted", i);
    }

    match gateway.dispatch(member, add("uid10", 2025, 1, 1, "")).await {
        Response::Denied(e) => {
            assert!(matches!(e.kind, SecurityErrorKind::RateLimitExceeded { .. }))
        }
        other => panic!("Expected rate limit rejection, got {:?}", other),
    }

    // Reads are not counted.
    assert!(matches!(
        gateway.dispatch(member, Request::ListUids).await,
        Response::Entries(_)
    ));

    let owner = Caller::new(OWNER, CHANNEL);
    assert!(gateway.dispatch(owner, add("other", 2025, 1, 1, "")).await.is_success());
}

#[tokio::test]
async fn test_dispatch_lookup_and_help() {
    let entry = Entry::new("abc123", date(2025, 1, 1), "test");
    let (_store, gateway) = gateway_with(vec![entry.clone()]);
    let member = Caller::new(MEMBER, CHANNEL);

    match gateway.dispatch(member, Request::ViewUid { uid: " abc123 ".into() }).await {
        Response::Lookup { uid, entry: found } => {
            assert_eq!(uid, "abc123");
            assert_eq!(found, Some(entry));
        }
        other => panic!("Expected lookup, got {:?}", other),
    }

    let missing = gateway.dispatch(member, Request::CheckUid { uid: "nope".into() }).await;
    assert!(matches!(missing, Response::Lookup { entry: None, .. }));
    assert!(!missing.is_success());

    match gateway.dispatch(member, Request::Help).await {
        Response::Help(text) => assert!(text.contains("/adduid <uid> <year> <month> <day> <comment>")),
        other => panic!("Expected help, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_writes_can_lose_an_update() {
    let (store, gateway) = gateway_with(vec![]);
    store.set_latency(Some(Duration::from_millis(50)));
    let gateway = Arc::new(gateway);

    let first = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.upsert("first", date(2025, 1, 1), "").await })
    };
    let second = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.upsert("second", date(2025, 1, 1), "").await })
    };

    // Both report success, but each wrote a document read before the other's write.
    assert!(matches!(first.await.unwrap(), UpsertOutcome::Added(_)));
    assert!(matches!(second.await.unwrap(), UpsertOutcome::Added(_)));
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(store.replace_count(), 2);
}
