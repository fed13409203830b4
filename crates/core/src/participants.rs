//! Participant resolution
//!
//! Turns the participant-extraction payload into a [`ResolvedParticipants`]
//! partition: names with a syntactically valid email, and names without one.

use invitekit_common::validation::{EmailValidator, FieldValidator, StringValidator};
use invitekit_domain::constants::{is_unknown, MAX_PARTICIPANT_NAME_LENGTH};
use invitekit_domain::{InviteKitError, ParticipantMention, ResolvedParticipants, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Validates and partitions participant mentions
#[derive(Debug, Clone)]
pub struct ParticipantResolver {
    emails: EmailValidator,
    names: StringValidator,
}

impl Default for ParticipantResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticipantResolver {
    pub fn new() -> Self {
        Self {
            emails: EmailValidator::new(),
            names: StringValidator::new().not_empty().max_length(MAX_PARTICIPANT_NAME_LENGTH),
        }
    }

    /// Resolve a JSON payload, either `{"participants": [...]}` or a bare
    /// array of `{name, email}` objects
    ///
    /// # Errors
    /// `ParticipantFormat` when the payload is not a sequence of
    /// name/optional-email pairs. Invalid emails are not errors; those
    /// names end up unresolved.
    pub fn resolve(&self, raw: &Value) -> Result<ResolvedParticipants> {
        let entries = match raw {
            Value::Array(entries) => entries,
            Value::Object(map) => match map.get("participants") {
                Some(Value::Array(entries)) => entries,
                Some(Value::Null) => return Ok(ResolvedParticipants::new()),
                Some(other) => {
                    return Err(format_error(format!(
                        "\"participants\" must be an array, got {}",
                        type_name(other)
                    )))
                }
                None => return Err(format_error("missing \"participants\" key")),
            },
            other => {
                return Err(format_error(format!(
                    "expected an array or an object, got {}",
                    type_name(other)
                )))
            }
        };

        let mut resolved = ResolvedParticipants::new();
        for (index, entry) in entries.iter().enumerate() {
            let (name, email) = self.parse_entry(index, entry)?;
            match email {
                Some(email) if self.emails.is_valid(&email) => resolved.insert_valid(name, email),
                Some(email) => {
                    warn!(participant = %name, %email, "Dropping invalid participant email");
                    resolved.mark_unresolved(name);
                }
                None => resolved.mark_unresolved(name),
            }
        }

        debug!(
            valid = resolved.valid().len(),
            unresolved = resolved.unresolved().len(),
            "Resolved participants"
        );
        Ok(resolved)
    }

    /// Resolve a payload given as JSON text
    pub fn resolve_str(&self, raw: &str) -> Result<ResolvedParticipants> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| format_error(format!("payload is not valid JSON: {e}")))?;
        self.resolve(&value)
    }

    fn parse_entry(&self, index: usize, entry: &Value) -> Result<(String, Option<String>)> {
        let mention = ParticipantMention::deserialize(entry)
            .map_err(|e| format_error(format!("participant {index}: {e}")))?;

        let name = mention.name.trim().to_string();
        self.names
            .validate(&name)
            .map_err(|message| format_error(format!("participant {index} name: {message}")))?;

        let email = mention
            .email
            .filter(|email| !is_unknown(email))
            .map(|email| email.trim().to_string());

        Ok((name, email))
    }
}

fn format_error(message: impl Into<String>) -> InviteKitError {
    InviteKitError::ParticipantFormat(message.into())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
