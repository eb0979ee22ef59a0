//! Tests for configuration loading and the offline commands.

use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use warden::{check_config, dump, ConfigLoader, WardenConfig};
use warden_core::Entry;
use warden_error::WardenErrorKind;

const COMPLETE: &str = r#"
[store]
url = "https://store.example/b/1"
api_key = "key"

[discord]
token = "token"
allowed_channel = 100
owners = [1, 2]
"#;

fn config_message(config: &WardenConfig) -> String {
    let err = config.require_discord().unwrap_err();
    match err.kind() {
        WardenErrorKind::Config(e) => e.message.clone(),
        other => panic!("Expected config error, got {:?}", other),
    }
}

#[test]
fn test_defaults() {
    let config = ConfigLoader::empty().load().unwrap();

    assert_eq!(config.store.timeout_secs, 10);
    assert_eq!(*config.cache.ttl_secs(), 300);
    assert_eq!(*config.rate_limit.max_requests(), 10);
    assert_eq!(*config.rate_limit.window_secs(), 60);
    assert_eq!(*config.validation.min_year(), 2000);
    assert_eq!(*config.validation.max_year(), 2100);
    assert_eq!(config.discord.log_channel, None);
}

#[test]
fn test_missing_settings_are_all_named() {
    let config = ConfigLoader::empty().load().unwrap();
    let message = config_message(&config);

    for field in [
        "store.url",
        "store.api_key",
        "discord.token",
        "discord.allowed_channel",
        "discord.owners",
    ] {
        assert!(message.contains(field), "{} not in {}", field, message);
    }
}

#[test]
fn test_store_requirements_ignore_discord() {
    let config = ConfigLoader::empty()
        .with_toml("[store]\nurl = \"u\"\napi_key = \"k\"")
        .load()
        .unwrap();

    assert!(config.require_store().is_ok());
    assert!(config.require_discord().is_err());
}

#[test]
fn test_toml_document() {
    let config = ConfigLoader::empty().with_toml(COMPLETE).load().unwrap();

    assert!(config.require_discord().is_ok());
    assert_eq!(config.discord.owners, vec![1, 2]);
    assert!(config.permissions().owners.len() == 2);
}

#[test]
fn test_prefixed_environment_overrides_file() {
    let config = ConfigLoader::empty()
        .with_toml(COMPLETE)
        .with_vars([
            ("WARDEN_STORE__URL", "https://other.example/b/2"),
            ("WARDEN_DISCORD__OWNERS", "7,8,9"),
            ("WARDEN_RATE_LIMIT__MAX_REQUESTS", "3"),
            ("UNRELATED", "x"),
        ])
        .load()
        .unwrap();

    assert_eq!(config.store.url, "https://other.example/b/2");
    assert_eq!(config.discord.owners, vec![7, 8, 9]);
    assert_eq!(*config.rate_limit.max_requests(), 3);
    assert_eq!(config.store.api_key, "key");
}

#[test]
fn test_legacy_variable_names() {
    let config = ConfigLoader::empty()
        .with_vars([
            ("JSONBIN_URL", "https://api.jsonbin.io/v3/b/abc"),
            ("JSONBIN_API_KEY", "master"),
            ("DISCORD_BOT_TOKEN", "bot"),
            ("ALLOWED_CHANNEL", "100"),
            ("DEV_DISCORD_ID", "42"),
            ("LOG_CHANNEL_ID", "0"),
        ])
        .load()
        .unwrap();

    assert!(config.require_discord().is_ok());
    assert_eq!(config.store.url, "https://api.jsonbin.io/v3/b/abc");
    assert_eq!(config.discord.owners, vec![42]);
    assert_eq!(config.discord.allowed_channel, 100);
    assert_eq!(config.discord.log_channel, Some(0));
}

#[test]
fn test_prefixed_variables_win_over_legacy() {
    let config = ConfigLoader::empty()
        .with_vars([
            ("DISCORD_BOT_TOKEN", "legacy"),
            ("WARDEN_DISCORD__TOKEN", "current"),
        ])
        .load()
        .unwrap();

    assert_eq!(config.discord.token, "current");
}

#[test]
fn test_non_numeric_legacy_id_is_an_error() {
    let result = ConfigLoader::empty()
        .with_vars([("ALLOWED_CHANNEL", "general")])
        .load();
    assert!(result.is_err());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = ConfigLoader::empty()
        .with_file(Some("/definitely/not/here/warden.toml".into()))
        .load();
    assert!(result.is_err());
}

#[test]
fn test_summary_hides_secrets() {
    let config = ConfigLoader::empty().with_toml(COMPLETE).load().unwrap();
    let summary = check_config(&config).unwrap();

    assert!(summary.contains("url = \"https://store.example/b/1\""));
    assert!(summary.contains("api_key = <redacted>"));
    assert!(summary.contains("token = <redacted>"));
    assert!(!summary.contains("\"key\""));
    assert!(!summary.contains("\"token\""));
}

fn export(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_dump_from_export_needs_no_store() {
    let config = ConfigLoader::empty().load().unwrap();
    let file = export(
        r#"[{"uid": "abc123", "expiry_date": "2025-01-01", "comment": "test"}]"#,
    );

    let output = dump(&config, Some(file.path())).await.unwrap();
    let entries: Vec<Entry> = serde_json::from_str(&output).unwrap();
    assert_eq!(
        entries,
        vec![Entry::new(
            "abc123",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            "test"
        )]
    );
}

#[tokio::test]
async fn test_dump_from_export_reports_bad_entry() {
    let config = ConfigLoader::empty().load().unwrap();
    let file = export(
        r#"[{"uid": "legacy", "expiry_date": "2025-13-01", "comment": ""}]"#,
    );

    let err = dump(&config, Some(file.path())).await.unwrap_err();
    match err.kind() {
        WardenErrorKind::Store(e) => assert!(e.to_string().contains("uid 'legacy'")),
        other => panic!("Expected store error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dump_from_missing_export_is_config_error() {
    let config = ConfigLoader::empty().load().unwrap();
    let err = dump(&config, Some(Path::new("/nonexistent/bin.json")))
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), WardenErrorKind::Config(_)));
}

#[tokio::test]
async fn test_dump_requires_store_settings() {
    let config = ConfigLoader::empty().load().unwrap();
    let err = dump(&config, None).await.unwrap_err();
    assert!(matches!(err.kind(), WardenErrorKind::Config(_)));
}
