//! Unit tests for `GlobalConfig` parsing and validation.
//!
//! Validates:
//! - Full and minimal TOML documents parse with expected values
//! - Defaults for leaderboard, paging, and broadcast settings
//! - Validation rejects empty admin/channel lists and zero intervals
//! - Admin and channel membership checks

use taskcaster::{config::GlobalConfig, AppError};

fn sample_toml() -> &'static str {
    r#"
db_path = "data/taskcaster.db"
admin_user_ids = ["U_ADMIN1", "U_ADMIN2"]
leaderboard_limit = 5
page_size = 3

[slack]
channel_ids = ["C123", "C456"]

[broadcast]
enabled = true
interval_seconds = 3600
announcement = "tasks are up"
"#
}

fn minimal_toml() -> &'static str {
    r#"
db_path = "taskcaster.db"
admin_user_ids = ["U_ADMIN"]

[slack]
channel_ids = ["C123"]
"#
}

#[test]
fn full_config_parses() {
    let config = GlobalConfig::from_toml_str(sample_toml()).expect("parse");

    assert_eq!(config.db_path.to_string_lossy(), "data/taskcaster.db");
    assert_eq!(config.admin_user_ids.len(), 2);
    assert_eq!(config.leaderboard_limit, 5);
    assert_eq!(config.page_size, 3);
    assert_eq!(config.slack.channel_ids, vec!["C123", "C456"]);
    assert!(config.broadcast.enabled);
    assert_eq!(config.broadcast.interval_seconds, 3600);
    assert_eq!(config.broadcast.announcement, "tasks are up");
}

#[test]
fn minimal_config_applies_defaults() {
    let config = GlobalConfig::from_toml_str(minimal_toml()).expect("parse");

    assert_eq!(config.leaderboard_limit, 10);
    assert_eq!(config.page_size, 10);
    assert!(config.broadcast.enabled);
    assert_eq!(config.broadcast.interval_seconds, 21_600);
    assert!(config.broadcast.announcement.contains("/task"));
}

#[test]
fn tokens_are_never_read_from_toml() {
    let config = GlobalConfig::from_toml_str(sample_toml()).expect("parse");

    assert!(config.slack.app_token.is_empty());
    assert!(config.slack.bot_token.is_empty());
}

#[test]
fn empty_admin_list_is_rejected() {
    let raw = r#"
db_path = "taskcaster.db"
admin_user_ids = []

[slack]
channel_ids = ["C123"]
"#;
    let err = GlobalConfig::from_toml_str(raw).expect_err("must fail");
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn empty_channel_list_is_rejected() {
    let raw = r#"
db_path = "taskcaster.db"
admin_user_ids = ["U_ADMIN"]

[slack]
channel_ids = []
"#;
    let err = GlobalConfig::from_toml_str(raw).expect_err("must fail");
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn zero_broadcast_interval_is_rejected() {
    let raw = r#"
db_path = "taskcaster.db"
admin_user_ids = ["U_ADMIN"]

[slack]
channel_ids = ["C123"]

[broadcast]
interval_seconds = 0
"#;
    let err = GlobalConfig::from_toml_str(raw).expect_err("must fail");
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn zero_page_size_is_rejected() {
    let raw = r#"
db_path = "taskcaster.db"
admin_user_ids = ["U_ADMIN"]
page_size = 0

[slack]
channel_ids = ["C123"]
"#;
    let err = GlobalConfig::from_toml_str(raw).expect_err("must fail");
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn admin_membership_checks() {
    let config = GlobalConfig::from_toml_str(sample_toml()).expect("parse");

    assert!(config.is_admin("U_ADMIN1"));
    assert!(!config.is_admin("U_STRANGER"));
    assert!(config.ensure_admin("U_ADMIN2").is_ok());
    assert!(matches!(
        config.ensure_admin("U_STRANGER"),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn channel_membership_checks() {
    let config = GlobalConfig::from_toml_str(sample_toml()).expect("parse");

    assert!(config.is_registered_channel("C123"));
    assert!(!config.is_registered_channel("C999"));
}
