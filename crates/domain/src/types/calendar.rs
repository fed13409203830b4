//! Calendar Service shapes: descriptors, the create-event request and the
//! handles returned to callers

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::event::{EventRecord, EventStatus};

/// A calendar the configured grant can see
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub is_primary: bool,
}

/// Participant entry as the Calendar Service represents it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Event timing, discriminated by the service's `object` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum EventWhen {
    /// Start/end as unix seconds
    Timespan { start_time: i64, end_time: i64 },
    Time { time: i64 },
    Date { date: String },
    Datespan { start_date: String, end_date: String },
    #[serde(other)]
    Other,
}

/// An event as returned by the Calendar Service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub id: String,
    #[serde(default)]
    pub calendar_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy: Option<bool>,
    #[serde(default)]
    pub participants: Vec<ParticipantDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<EventWhen>,
}

/// Body of the create-event call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub status: EventStatus,
    pub busy: bool,
    pub participants: Vec<ParticipantDescriptor>,
    pub description: String,
    pub location: String,
    pub when: EventWhen,
}

impl From<&EventRecord> for CreateEventRequest {
    fn from(record: &EventRecord) -> Self {
        let participants = record
            .attendees()
            .iter()
            .filter_map(|contact| {
                contact.email.as_ref().map(|email| ParticipantDescriptor {
                    name: Some(contact.name.clone()),
                    email: email.clone(),
                    status: None,
                })
            })
            .collect();

        Self {
            title: record.title().to_string(),
            status: record.status(),
            busy: record.busy(),
            participants,
            description: record.description().to_string(),
            location: record.location().to_string(),
            when: EventWhen::Timespan {
                start_time: record.start().timestamp(),
                end_time: record.end().timestamp(),
            },
        }
    }
}

/// Identifier of an event created remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEventHandle {
    pub id: String,
    pub calendar_id: String,
}

/// Where an exported record ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ExportReceipt {
    Remote(RemoteEventHandle),
    File { path: PathBuf },
}
