//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! pipeline.

// Extraction contract
pub const UNKNOWN_SENTINEL: &str = "unknown";

// Event defaults
pub const DEFAULT_EVENT_DURATION_SECS: u64 = 3600;
pub const DEFAULT_HOME_TIMEZONE: &str = "America/Los_Angeles";
pub const MAX_PARTICIPANT_NAME_LENGTH: usize = 256;
/// Longest accepted run deadline (one day)
pub const MAX_DEADLINE_SECS: u64 = 86_400;

// External services
pub const DEFAULT_EXTRACTION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EXTRACTION_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://api.us.nylas.com/v3";
pub const DEFAULT_EVENT_LIST_LIMIT: u32 = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Calendar file export
pub const ICS_PRODID: &str = "-//InviteKit//EN";

/// True when `value` is the extraction sentinel (or blank).
pub fn is_unknown(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_SENTINEL)
}
