//! Error types used throughout the pipeline

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::impl_domain_status_conversions;

/// Main error type for InviteKit
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum InviteKitError {
    #[error("Time parse error: {0}")]
    TimeParse(String),

    #[error("Participant format error: {0}")]
    ParticipantFormat(String),

    #[error("Invalid span: start {start} is not before end {end}")]
    InvalidSpan { start: DateTime<Utc>, end: DateTime<Utc> },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Remote submission failed{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    RemoteSubmission { status: Option<u16>, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Deadline exceeded after {0:?}")]
    Timeout(Duration),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fieldless mirror of [`InviteKitError`] variants.
///
/// Callers match on the kind to decide how to report a failure without
/// destructuring the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    TimeParse,
    ParticipantFormat,
    InvalidSpan,
    MissingField,
    RemoteSubmission,
    Serialization,
    Extraction,
    Network,
    Auth,
    Config,
    Timeout,
    Cancelled,
    Internal,
}

impl_domain_status_conversions!(ErrorKind {
    TimeParse => "time_parse",
    ParticipantFormat => "participant_format",
    InvalidSpan => "invalid_span",
    MissingField => "missing_field",
    RemoteSubmission => "remote_submission",
    Serialization => "serialization",
    Extraction => "extraction",
    Network => "network",
    Auth => "auth",
    Config => "config",
    Timeout => "timeout",
    Cancelled => "cancelled",
    Internal => "internal",
});

impl InviteKitError {
    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TimeParse(_) => ErrorKind::TimeParse,
            Self::ParticipantFormat(_) => ErrorKind::ParticipantFormat,
            Self::InvalidSpan { .. } => ErrorKind::InvalidSpan,
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::RemoteSubmission { .. } => ErrorKind::RemoteSubmission,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Extraction(_) => ErrorKind::Extraction,
            Self::Network(_) => ErrorKind::Network,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Config(_) => ErrorKind::Config,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for InviteKit operations
pub type Result<T> = std::result::Result<T, InviteKitError>;
