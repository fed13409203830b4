//! The canonical event record and its building blocks

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{InviteKitError, Result};
use crate::impl_domain_status_conversions;

/// A named attendee with an optional email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Contact {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: Some(email.into()) }
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        Self { name: name.into(), email: None }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{} <{}>", self.name, email),
            None => f.write_str(&self.name),
        }
    }
}

/// Half-open interval of UTC instants with `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    /// Build a span, rejecting `end <= start`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let span = Self { start, end };
        span.validate()?;
        Ok(span)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start < self.end {
            Ok(())
        } else {
            Err(InviteKitError::InvalidSpan { start: self.start, end: self.end })
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Event status; freshly created events are always confirmed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Confirmed,
}

impl_domain_status_conversions!(EventStatus {
    Confirmed => "confirmed",
});

/// Outcome of participant resolution.
///
/// `valid` preserves the order in which names were first seen; a repeated
/// name keeps its first position but takes the latest email. A name is in
/// at most one of the two partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedParticipants {
    valid: Vec<Contact>,
    unresolved: BTreeSet<String>,
}

impl ResolvedParticipants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name with a validated email
    pub fn insert_valid(&mut self, name: impl Into<String>, email: impl Into<String>) {
        let name = name.into();
        let email = email.into();
        self.unresolved.remove(&name);
        match self.valid.iter_mut().find(|contact| contact.name == name) {
            Some(existing) => existing.email = Some(email),
            None => self.valid.push(Contact::new(name, email)),
        }
    }

    /// Record a name that has no usable email, unless it already resolved
    pub fn mark_unresolved(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.is_valid(&name) {
            self.unresolved.insert(name);
        }
    }

    /// Contacts with a validated email, in first-seen order
    pub fn valid(&self) -> &[Contact] {
        &self.valid
    }

    pub fn unresolved(&self) -> &BTreeSet<String> {
        &self.unresolved
    }

    pub fn email_for(&self, name: &str) -> Option<&str> {
        self.valid.iter().find(|contact| contact.name == name).and_then(|c| c.email.as_deref())
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.valid.iter().any(|contact| contact.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.unresolved.is_empty()
    }

    /// Consume into the attendee list
    pub fn into_attendees(self) -> Vec<Contact> {
        self.valid
    }
}

/// Canonical, validated meeting record.
///
/// Only constructed through the assembler, which guarantees a non-empty
/// title, a valid span and attendees that all carry an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    title: String,
    description: String,
    location: String,
    span: TimeSpan,
    attendees: Vec<Contact>,
    busy: bool,
    status: EventStatus,
}

impl EventRecord {
    /// Build a record from already-validated parts
    pub fn new(
        title: String,
        description: String,
        location: String,
        span: TimeSpan,
        attendees: Vec<Contact>,
        busy: bool,
    ) -> Self {
        Self { title, description, location, span, attendees, busy, status: EventStatus::Confirmed }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn span(&self) -> TimeSpan {
        self.span
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.span.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.span.end
    }

    pub fn attendees(&self) -> &[Contact] {
        &self.attendees
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }
}
