//! Configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALENDAR_API_BASE, DEFAULT_EVENT_DURATION_SECS, DEFAULT_EXTRACTION_API_URL,
    DEFAULT_EXTRACTION_MODEL, DEFAULT_HOME_TIMEZONE, DEFAULT_HTTP_TIMEOUT_SECS,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Pipeline behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// IANA timezone used to anchor naive times
    pub home_timezone: String,
    /// Duration applied when no usable end time was extracted
    pub default_duration_secs: u64,
    /// Reject sentinel titles and locations
    pub strict: bool,
    /// Overall deadline for one run, if any
    pub deadline_secs: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            home_timezone: DEFAULT_HOME_TIMEZONE.to_string(),
            default_duration_secs: DEFAULT_EVENT_DURATION_SECS,
            strict: false,
            deadline_secs: None,
        }
    }
}

fn default_model() -> String {
    DEFAULT_EXTRACTION_MODEL.to_string()
}

fn default_extraction_url() -> String {
    DEFAULT_EXTRACTION_API_URL.to_string()
}

fn default_calendar_base() -> String {
    DEFAULT_CALENDAR_API_BASE.to_string()
}

const fn default_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

const fn default_max_attempts() -> u32 {
    1
}

/// Chat-completion extraction endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_extraction_url")]
    pub api_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// HTTP attempts per call; 1 disables retries
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            api_url: default_extraction_url(),
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

// Keys never reach logs.
impl std::fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Calendar REST backend
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_calendar_base")]
    pub api_base: String,
    #[serde(default)]
    pub grant_id: String,
    #[serde(default)]
    pub api_key: String,
    /// Calendar used when a command does not name one
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Create calls are not retried unless this is raised
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base: default_calendar_base(),
            grant_id: String::new(),
            api_key: String::new(),
            calendar_id: None,
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl CalendarConfig {
    /// Both credentials are present
    pub fn is_configured(&self) -> bool {
        !self.grant_id.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

impl std::fmt::Debug for CalendarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarConfig")
            .field("api_base", &self.api_base)
            .field("grant_id", &self.grant_id)
            .field("api_key", &"<redacted>")
            .field("calendar_id", &self.calendar_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
