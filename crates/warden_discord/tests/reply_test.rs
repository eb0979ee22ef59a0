//! Tests for reply rendering.

use chrono::NaiveDate;
use warden_core::{Entry, RejectReason, RemoveOutcome, UpsertOutcome};
use warden_discord::{render, Reply, MESSAGE_LIMIT};
use warden_gateway::{Command, Response};
use warden_security::{SecurityError, SecurityErrorKind};

fn entry(uid: &str) -> Entry {
    Entry::new(uid, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), "test")
}

#[test]
fn test_checkuid_renders_json_block() {
    let response = Response::Lookup {
        uid: "abc123".into(),
        entry: Some(entry("abc123")),
    };

    assert_eq!(
        render(Command::CheckUid, &response),
        Reply::public(
            "```json\n[\n  {\n    \"uid\": \"abc123\",\n    \"expiry_date\": \"2025-01-01\",\n    \"comment\": \"test\"\n  }\n]\n```"
        )
    );
}

#[test]
fn test_viewuid_renders_box_with_day_first_date() {
    let response = Response::Lookup {
        uid: "abc123".into(),
        entry: Some(Entry::new(
            "abc123",
            NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
            "vip",
        )),
    };

    let reply = render(Command::ViewUid, &response);
    assert!(!reply.ephemeral);
    assert!(reply.content.starts_with("```\n📦 WHITELIST ENTRY\n"));
    assert!(reply.content.contains("UID:        abc123\n"));
    assert!(reply.content.contains("Expiry:     09 - 06 - 2025\n"));
    assert!(reply.content.contains("Comment:    vip\n"));
}

#[test]
fn test_viewuid_shortens_long_comment_to_one_message() {
    let comment = "x".repeat(3000);
    let response = Response::Lookup {
        uid: "abc123".into(),
        entry: Some(Entry::new(
            "abc123",
            NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
            comment,
        )),
    };

    let reply = render(Command::ViewUid, &response);
    assert_eq!(reply.content.chars().count(), MESSAGE_LIMIT);
    assert!(reply.content.contains("UID:        abc123\n"));
    assert!(reply.content.ends_with("x…\n```"));
}

#[test]
fn test_empty_list() {
    let reply = render(Command::ListUids, &Response::Entries(vec![]));
    assert_eq!(reply.content, "```json\n[]\n```");
}

#[test]
fn test_long_list_is_cut_to_one_message() {
    let entries: Vec<_> = (0..200).map(|i| entry(&format!("uid-{:03}", i))).collect();

    let reply = render(Command::ListUids, &Response::Entries(entries));

    assert!(reply.content.chars().count() <= MESSAGE_LIMIT);
    assert!(reply.content.contains("\"uid-000\""));
    assert!(!reply.content.contains("\"uid-199\""));
    assert!(reply.content.ends_with("more entries."));
}

#[test]
fn test_mutation_replies_are_ephemeral() {
    let cases = [
        (
            Command::AddUid,
            Response::Upserted(UpsertOutcome::Added(entry("x"))),
            "🟢 UID **x** added.",
        ),
        (
            Command::AddUid,
            Response::Upserted(UpsertOutcome::Updated(entry("x"))),
            "🟡 UID **x** updated.",
        ),
        (
            Command::AddUid,
            Response::Upserted(UpsertOutcome::Rejected(RejectReason::StoreWriteFailed)),
            "❌ Error saving UID to database.",
        ),
        (
            Command::AddUid,
            Response::Upserted(UpsertOutcome::Rejected(RejectReason::invalid(
                "month",
                "must be between 1 and 12",
            ))),
            "❌ Invalid month: must be between 1 and 12.",
        ),
        (
            Command::RemoveUid,
            Response::Removed(RemoveOutcome::Removed(entry("x"))),
            "🔴 UID **x** removed.",
        ),
        (
            Command::RemoveUid,
            Response::Removed(RemoveOutcome::NotFound),
            "❌ UID not found or error removing.",
        ),
        (
            Command::RemoveUid,
            Response::Removed(RemoveOutcome::Rejected(RejectReason::StoreReadFailed)),
            "❌ Database connection error.",
        ),
        (
            Command::Pause,
            Response::PauseChanged {
                paused: true,
                previous: false,
            },
            "⏸️ Whitelist PAUSED.",
        ),
        (
            Command::Resume,
            Response::PauseChanged {
                paused: false,
                previous: true,
            },
            "▶️ Whitelist RESUMED.",
        ),
    ];

    for (command, response, expected) in cases {
        assert_eq!(render(command, &response), Reply::ephemeral(expected));
    }
}

#[test]
fn test_denials_use_guard_messages() {
    let paused = Response::Denied(SecurityError::new(SecurityErrorKind::Paused {
        command: "adduid".into(),
    }));
    assert_eq!(
        render(Command::AddUid, &paused),
        Reply::ephemeral("⚠️ Whitelist system is currently **PAUSED**.")
    );

    let not_owner = Response::Denied(SecurityError::new(SecurityErrorKind::PermissionDenied {
        command: "pause".into(),
        reason: "not an owner".into(),
    }));
    assert_eq!(
        render(Command::Pause, &not_owner),
        Reply::ephemeral("❌ Only the **bot owner** can use this command.")
    );
}
