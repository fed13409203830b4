//! Validated pipeline settings

use std::time::Duration as StdDuration;

use chrono::Duration;
use chrono_tz::Tz;
use invitekit_domain::constants::{
    DEFAULT_EVENT_DURATION_SECS, DEFAULT_HOME_TIMEZONE, MAX_DEADLINE_SECS,
};
use invitekit_domain::{InviteKitError, PipelineConfig, Result};

/// Read-only settings shared by every stage of one orchestrator.
///
/// Built once from [`PipelineConfig`] and handed around behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub home_timezone: Tz,
    pub default_duration: Duration,
    pub strict: bool,
    /// Upper bound on one run, covering every external call
    pub deadline: Option<StdDuration>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            home_timezone: DEFAULT_HOME_TIMEZONE.parse().unwrap_or(Tz::UTC),
            default_duration: Duration::seconds(DEFAULT_EVENT_DURATION_SECS as i64),
            strict: false,
            deadline: None,
        }
    }
}

impl PipelineSettings {
    /// Validate a [`PipelineConfig`]
    ///
    /// # Errors
    /// `Config` for an unknown IANA timezone, a zero/oversized duration or a
    /// deadline outside `1..=MAX_DEADLINE_SECS`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let home_timezone: Tz = config.home_timezone.trim().parse().map_err(|_| {
            InviteKitError::Config(format!("Unknown timezone: {}", config.home_timezone))
        })?;

        let default_duration = i64::try_from(config.default_duration_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                InviteKitError::Config(format!(
                    "default_duration_secs must be positive, got {}",
                    config.default_duration_secs
                ))
            })?;

        let deadline = match config.deadline_secs {
            Some(0) => {
                return Err(InviteKitError::Config("deadline_secs must be positive".to_string()))
            }
            Some(secs) if secs > MAX_DEADLINE_SECS => {
                return Err(InviteKitError::Config(format!(
                    "deadline_secs must be at most {MAX_DEADLINE_SECS}, got {secs}"
                )))
            }
            other => other.map(StdDuration::from_secs),
        };

        Ok(Self { home_timezone, default_duration, strict: config.strict, deadline })
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.home_timezone = timezone;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_deadline(mut self, deadline: StdDuration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}
