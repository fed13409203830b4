//! Payloads produced by the Extraction Service

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{is_unknown, UNKNOWN_SENTINEL};

fn unknown() -> String {
    UNKNOWN_SENTINEL.to_string()
}

/// Null → sentinel, string → as-is.
fn nullable_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParticipantsWire {
    Text(String),
    List(Vec<String>),
}

/// Participants arrive as free text or as a list of mentions; lists are
/// joined so the field stays a plain string.
fn participants_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ParticipantsWire>::deserialize(deserializer)? {
        None => unknown(),
        Some(ParticipantsWire::Text(text)) => text,
        Some(ParticipantsWire::List(items)) if items.is_empty() => unknown(),
        Some(ParticipantsWire::List(items)) => items.join(", "),
    })
}

/// Field set extracted from a free-text meeting description.
///
/// Every field is a string; anything the service could not determine holds
/// the `"unknown"` sentinel. Absent and null keys deserialize to the sentinel
/// so downstream code never sees a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExtraction {
    #[serde(default = "unknown", deserialize_with = "nullable_field")]
    pub title: String,
    #[serde(default = "unknown", deserialize_with = "nullable_field")]
    pub description: String,
    #[serde(default = "unknown", deserialize_with = "nullable_field")]
    pub when: String,
    #[serde(default = "unknown", deserialize_with = "nullable_field")]
    pub location: String,
    #[serde(default = "unknown", deserialize_with = "participants_field")]
    pub participants: String,
}

impl Default for RawExtraction {
    fn default() -> Self {
        Self {
            title: unknown(),
            description: unknown(),
            when: unknown(),
            location: unknown(),
            participants: unknown(),
        }
    }
}

impl RawExtraction {
    /// True when the service could not determine a start time expression
    pub fn when_is_unknown(&self) -> bool {
        is_unknown(&self.when)
    }
}

/// One participant mention as returned by participant extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantMention {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EndTimeWire {
    Object { end_time: Option<String> },
    Bare(Option<String>),
}

impl From<EndTimeWire> for EndTimeResponse {
    fn from(wire: EndTimeWire) -> Self {
        let value = match wire {
            EndTimeWire::Object { end_time } => end_time,
            EndTimeWire::Bare(value) => value,
        };
        Self::from_expression(value.as_deref())
    }
}

/// Outcome of asking the Extraction Service for an explicit end time.
///
/// Accepts `{"end_time": "YYYY-MM-DD HH:MM:SS"}`, `{"end_time": "unknown"}`,
/// the bare string `"unknown"` and `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "EndTimeWire")]
pub enum EndTimeResponse {
    /// An end-time expression, normally `YYYY-MM-DD HH:MM:SS`
    Explicit(String),
    /// The service found no usable end time
    Unknown,
}

impl EndTimeResponse {
    /// Classify an optional raw expression
    pub fn from_expression(value: Option<&str>) -> Self {
        match value {
            Some(text) if !is_unknown(text) => Self::Explicit(text.trim().to_string()),
            _ => Self::Unknown,
        }
    }

    /// The explicit expression, if any
    pub fn expression(&self) -> Option<&str> {
        match self {
            Self::Explicit(text) => Some(text),
            Self::Unknown => None,
        }
    }
}
