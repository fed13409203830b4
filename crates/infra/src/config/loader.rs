//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the extraction key is missing there, falls back to a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `INVITEKIT_EXTRACTION_API_KEY` (or `OPENAI_API_KEY`): extraction key, required
//! - `INVITEKIT_EXTRACTION_MODEL`, `INVITEKIT_EXTRACTION_API_URL`,
//!   `INVITEKIT_EXTRACTION_TIMEOUT`, `INVITEKIT_EXTRACTION_MAX_ATTEMPTS`
//! - `INVITEKIT_CALENDAR_API_BASE`, `INVITEKIT_CALENDAR_GRANT_ID`,
//!   `INVITEKIT_CALENDAR_API_KEY`, `INVITEKIT_CALENDAR_ID`,
//!   `INVITEKIT_CALENDAR_TIMEOUT`, `INVITEKIT_CALENDAR_MAX_ATTEMPTS`
//! - `INVITEKIT_TIMEZONE`, `INVITEKIT_DEFAULT_DURATION`, `INVITEKIT_STRICT`,
//!   `INVITEKIT_DEADLINE`
//! - `INVITEKIT_LOG_LEVEL`, `INVITEKIT_LOG_JSON`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./invitekit.json` or `./invitekit.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use invitekit_domain::{
    CalendarConfig, Config, ExtractionConfig, InviteKitError, LoggingConfig, PipelineConfig,
    Result,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["invitekit.json", "invitekit.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the extraction key
/// is not set there, falls back to loading from a config file.
///
/// # Errors
/// Returns `InviteKitError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only the extraction key is required; everything else falls back to the
/// defaults of the domain config types.
///
/// # Errors
/// Returns `InviteKitError::Config` if the key is missing or a value does
/// not parse.
pub fn load_from_env() -> Result<Config> {
    let api_key = env_var("INVITEKIT_EXTRACTION_API_KEY").or_else(|_| env_var("OPENAI_API_KEY"))?;

    let extraction_defaults = ExtractionConfig::default();
    let extraction = ExtractionConfig {
        api_key,
        model: env_opt("INVITEKIT_EXTRACTION_MODEL").unwrap_or(extraction_defaults.model),
        api_url: env_opt("INVITEKIT_EXTRACTION_API_URL").unwrap_or(extraction_defaults.api_url),
        timeout_secs: env_parse("INVITEKIT_EXTRACTION_TIMEOUT")?
            .unwrap_or(extraction_defaults.timeout_secs),
        max_attempts: env_parse("INVITEKIT_EXTRACTION_MAX_ATTEMPTS")?
            .unwrap_or(extraction_defaults.max_attempts),
    };

    let calendar_defaults = CalendarConfig::default();
    let calendar = CalendarConfig {
        api_base: env_opt("INVITEKIT_CALENDAR_API_BASE").unwrap_or(calendar_defaults.api_base),
        grant_id: env_opt("INVITEKIT_CALENDAR_GRANT_ID").unwrap_or_default(),
        api_key: env_opt("INVITEKIT_CALENDAR_API_KEY").unwrap_or_default(),
        calendar_id: env_opt("INVITEKIT_CALENDAR_ID"),
        timeout_secs: env_parse("INVITEKIT_CALENDAR_TIMEOUT")?
            .unwrap_or(calendar_defaults.timeout_secs),
        max_attempts: env_parse("INVITEKIT_CALENDAR_MAX_ATTEMPTS")?
            .unwrap_or(calendar_defaults.max_attempts),
    };

    let pipeline_defaults = PipelineConfig::default();
    let pipeline = PipelineConfig {
        home_timezone: env_opt("INVITEKIT_TIMEZONE").unwrap_or(pipeline_defaults.home_timezone),
        default_duration_secs: env_parse("INVITEKIT_DEFAULT_DURATION")?
            .unwrap_or(pipeline_defaults.default_duration_secs),
        strict: env_bool("INVITEKIT_STRICT", pipeline_defaults.strict),
        deadline_secs: env_parse("INVITEKIT_DEADLINE")?,
    };

    let logging_defaults = LoggingConfig::default();
    let logging = LoggingConfig {
        level: env_opt("INVITEKIT_LOG_LEVEL").unwrap_or(logging_defaults.level),
        json: env_bool("INVITEKIT_LOG_JSON", logging_defaults.json),
    };

    Ok(Config { pipeline, extraction, calendar, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `InviteKitError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(InviteKitError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            InviteKitError::Config(
                "No config file found and INVITEKIT_EXTRACTION_API_KEY is not set".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| InviteKitError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let config: Config = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| InviteKitError::Config(format!("Invalid TOML format: {e}")))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| InviteKitError::Config(format!("Invalid JSON format: {e}")))?,
        _ => {
            return Err(InviteKitError::Config(format!("Unsupported config format: {extension}")))
        }
    };

    if config.extraction.api_key.trim().is_empty() {
        return Err(InviteKitError::Config("extraction.api_key must not be empty".to_string()));
    }
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent, then
/// the executable's directory. Returns the first file found.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        InviteKitError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-blank environment variable, trimmed
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| InviteKitError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 18] = [
        "INVITEKIT_EXTRACTION_API_KEY",
        "OPENAI_API_KEY",
        "INVITEKIT_EXTRACTION_MODEL",
        "INVITEKIT_EXTRACTION_API_URL",
        "INVITEKIT_EXTRACTION_TIMEOUT",
        "INVITEKIT_EXTRACTION_MAX_ATTEMPTS",
        "INVITEKIT_CALENDAR_API_BASE",
        "INVITEKIT_CALENDAR_GRANT_ID",
        "INVITEKIT_CALENDAR_API_KEY",
        "INVITEKIT_CALENDAR_ID",
        "INVITEKIT_CALENDAR_TIMEOUT",
        "INVITEKIT_CALENDAR_MAX_ATTEMPTS",
        "INVITEKIT_TIMEZONE",
        "INVITEKIT_DEFAULT_DURATION",
        "INVITEKIT_STRICT",
        "INVITEKIT_DEADLINE",
        "INVITEKIT_LOG_LEVEL",
        "INVITEKIT_LOG_JSON",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn write_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        (temp_file, path)
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TEST_INVITEKIT_BOOL_YES", "yes");
        std::env::set_var("TEST_INVITEKIT_BOOL_UPPER", "TRUE");
        std::env::set_var("TEST_INVITEKIT_BOOL_OFF", "off");

        assert!(env_bool("TEST_INVITEKIT_BOOL_YES", false));
        assert!(env_bool("TEST_INVITEKIT_BOOL_UPPER", false));
        assert!(!env_bool("TEST_INVITEKIT_BOOL_OFF", true));

        std::env::remove_var("TEST_INVITEKIT_BOOL_MISSING");
        assert!(env_bool("TEST_INVITEKIT_BOOL_MISSING", true));

        std::env::remove_var("TEST_INVITEKIT_BOOL_YES");
        std::env::remove_var("TEST_INVITEKIT_BOOL_UPPER");
        std::env::remove_var("TEST_INVITEKIT_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_with_overrides() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("INVITEKIT_EXTRACTION_API_KEY", "sk-env");
        std::env::set_var("INVITEKIT_CALENDAR_GRANT_ID", "grant-1");
        std::env::set_var("INVITEKIT_CALENDAR_API_KEY", "nyk-1");
        std::env::set_var("INVITEKIT_CALENDAR_ID", "primary");
        std::env::set_var("INVITEKIT_TIMEZONE", "Europe/Berlin");
        std::env::set_var("INVITEKIT_DEFAULT_DURATION", "1800");
        std::env::set_var("INVITEKIT_STRICT", "on");
        std::env::set_var("INVITEKIT_DEADLINE", "20");
        std::env::set_var("INVITEKIT_LOG_JSON", "1");

        let config = load_from_env().unwrap();
        clear_env();

        assert_eq!(config.extraction.api_key, "sk-env");
        assert_eq!(config.extraction.model, "gpt-4o-mini");
        assert!(config.calendar.is_configured());
        assert_eq!(config.calendar.calendar_id.as_deref(), Some("primary"));
        assert_eq!(config.calendar.max_attempts, 1);
        assert_eq!(config.pipeline.home_timezone, "Europe/Berlin");
        assert_eq!(config.pipeline.default_duration_secs, 1800);
        assert!(config.pipeline.strict);
        assert_eq!(config.pipeline.deadline_secs, Some(20));
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_openai_key_is_accepted_as_fallback() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-openai");

        let config = load_from_env().unwrap();
        clear_env();

        assert_eq!(config.extraction.api_key, "sk-openai");
    }

    #[test]
    fn test_load_from_env_missing_key() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, InviteKitError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("INVITEKIT_EXTRACTION_API_KEY", "sk-env");
        std::env::set_var("INVITEKIT_DEFAULT_DURATION", "an hour");

        let result = load_from_env();
        clear_env();

        match result {
            Err(InviteKitError::Config(msg)) => assert!(msg.contains("INVITEKIT_DEFAULT_DURATION")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file_json() {
        let (_temp, path) = write_config(
            r#"{
                "extraction": {"api_key": "sk-file"},
                "pipeline": {"home_timezone": "UTC", "strict": true},
                "calendar": {"grant_id": "g", "api_key": "k"}
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(config.extraction.api_key, "sk-file");
        assert_eq!(config.pipeline.home_timezone, "UTC");
        assert!(config.pipeline.strict);
        assert_eq!(config.pipeline.default_duration_secs, 3600);
        assert!(config.calendar.is_configured());
    }

    #[test]
    fn test_load_from_file_toml() {
        let (_temp, path) = write_config(
            r#"
[extraction]
api_key = "sk-file"
model = "gpt-4o"

[pipeline]
deadline_secs = 15

[logging]
level = "debug"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(config.extraction.model, "gpt-4o");
        assert_eq!(config.pipeline.deadline_secs, Some(15));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/invitekit.json")));
        assert!(matches!(result, Err(InviteKitError::Config(_))));
    }

    #[test]
    fn test_blank_api_key_in_file_is_rejected() {
        let result = parse_config(r#"{"extraction": {"api_key": "  "}}"#, Path::new("x.json"));
        assert!(matches!(result, Err(InviteKitError::Config(msg)) if msg.contains("api_key")));
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config(r#"{ "extraction": "#, Path::new("x.json"));
        assert!(matches!(result, Err(InviteKitError::Config(msg)) if msg.contains("JSON")));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("extraction: {}", Path::new("x.yaml"));
        assert!(matches!(result, Err(InviteKitError::Config(_))));
    }
}
