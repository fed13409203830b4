//! Event assembly
//!
//! Combines the extracted fields, the resolved span and the resolved
//! participants into one invariant-checked [`EventRecord`].

use invitekit_domain::constants::is_unknown;
use invitekit_domain::{
    EventRecord, InviteKitError, RawExtraction, ResolvedParticipants, Result, TimeSpan,
};
use tracing::debug;

/// Builds [`EventRecord`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct EventAssembler {
    strict: bool,
}

impl EventAssembler {
    /// In strict mode, sentinel titles and locations are rejected
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Assemble a record.
    ///
    /// Name-only participants are not carried into the record. The span is
    /// checked, never repaired.
    ///
    /// # Errors
    /// - `InvalidSpan` when `span.start >= span.end`
    /// - `MissingField("title")` for a blank title
    /// - `MissingField(..)` for sentinel title/location in strict mode
    pub fn assemble(
        &self,
        raw: &RawExtraction,
        participants: &ResolvedParticipants,
        span: TimeSpan,
    ) -> Result<EventRecord> {
        span.validate()?;

        if raw.title.trim().is_empty() {
            return Err(InviteKitError::MissingField("title".to_string()));
        }

        if self.strict {
            if is_unknown(&raw.title) {
                return Err(InviteKitError::MissingField("title".to_string()));
            }
            if is_unknown(&raw.location) {
                return Err(InviteKitError::MissingField("location".to_string()));
            }
        }

        let attendees = participants.valid().to_vec();
        debug!(
            attendees = attendees.len(),
            dropped = participants.unresolved().len(),
            strict = self.strict,
            "Assembled event record"
        );

        Ok(EventRecord::new(
            raw.title.clone(),
            raw.description.clone(),
            raw.location.clone(),
            span,
            attendees,
            true,
        ))
    }
}
