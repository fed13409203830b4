//! Integration tests for configuration loader
//!
//! Loads complete files through the public API and feeds the result into
//! the pipeline settings.

use std::io::Write;

use invitekit_core::PipelineSettings;
use invitekit_domain::InviteKitError;
use invitekit_infra::config;
use tempfile::NamedTempFile;

fn config_file(contents: &str, extension: &str) -> (NamedTempFile, std::path::PathBuf) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    (temp_file, path)
}

#[test]
fn test_load_config_from_json_file() {
    let (_temp, path) = config_file(
        r#"{
            "pipeline": {
                "home_timezone": "Asia/Shanghai",
                "default_duration_secs": 2700,
                "strict": true,
                "deadline_secs": 30
            },
            "extraction": {
                "api_key": "sk-integration",
                "model": "gpt-4o-mini",
                "timeout_secs": 10
            },
            "calendar": {
                "grant_id": "grant-123",
                "api_key": "nyk-456",
                "calendar_id": "team@example.com"
            },
            "logging": { "level": "debug", "json": true }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");
    std::fs::remove_file(path).ok();

    assert_eq!(config.extraction.timeout_secs, 10);
    assert_eq!(config.calendar.calendar_id.as_deref(), Some("team@example.com"));
    assert_eq!(config.calendar.api_base, "https://api.us.nylas.com/v3");
    assert!(config.logging.json);

    let settings = PipelineSettings::from_config(&config.pipeline).expect("settings");
    assert_eq!(settings.home_timezone, chrono_tz::Asia::Shanghai);
    assert_eq!(settings.default_duration, chrono::Duration::seconds(2700));
    assert!(settings.strict);
    assert_eq!(settings.deadline, Some(std::time::Duration::from_secs(30)));
}

#[test]
fn test_load_config_from_toml_file() {
    let (_temp, path) = config_file(
        r#"
[extraction]
api_key = "sk-toml"

[calendar]
grant_id = "grant-toml"
api_key = "nyk-toml"
max_attempts = 2
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");
    std::fs::remove_file(path).ok();

    assert_eq!(config.extraction.api_key, "sk-toml");
    assert_eq!(config.calendar.max_attempts, 2);
    assert_eq!(config.pipeline.home_timezone, "America/Los_Angeles");
}

#[test]
fn test_unknown_timezone_is_rejected_by_settings() {
    let (_temp, path) = config_file(
        r#"{"extraction": {"api_key": "sk"}, "pipeline": {"home_timezone": "Mars/Olympus"}}"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("file itself is valid");
    std::fs::remove_file(path).ok();

    let err = PipelineSettings::from_config(&config.pipeline).unwrap_err();
    assert!(matches!(err, InviteKitError::Config(msg) if msg.contains("Mars/Olympus")));
}

#[test]
fn test_missing_extraction_section_is_config_error() {
    let (_temp, path) = config_file(r#"{"pipeline": {"strict": true}}"#, "json");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    assert!(matches!(result, Err(InviteKitError::Config(_))));
}
