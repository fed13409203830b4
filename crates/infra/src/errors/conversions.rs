//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use invitekit_domain::InviteKitError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub InviteKitError);

impl From<InfraError> for InviteKitError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<InviteKitError> for InfraError {
    fn from(value: InviteKitError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoInviteKitError {
    fn into_invitekit(self) -> InviteKitError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → InviteKitError */
/* -------------------------------------------------------------------------- */

impl IntoInviteKitError for HttpError {
    fn into_invitekit(self) -> InviteKitError {
        if self.is_timeout() {
            return InviteKitError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return InviteKitError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return InviteKitError::Serialization(format!("failed to decode response: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => InviteKitError::Auth(message),
                _ => InviteKitError::Network(message),
            };
        }

        InviteKitError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_invitekit())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → InviteKitError */
/* -------------------------------------------------------------------------- */

impl IntoInviteKitError for IoError {
    fn into_invitekit(self) -> InviteKitError {
        use std::io::ErrorKind as IoKind;

        let detail = match self.kind() {
            IoKind::NotFound => "path not found",
            IoKind::PermissionDenied => "permission denied",
            IoKind::AlreadyExists => "file already exists",
            IoKind::WriteZero | IoKind::UnexpectedEof => "short write",
            _ => "I/O failure",
        };
        InviteKitError::Serialization(format!("{detail}: {self}"))
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_invitekit())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → InviteKitError */
/* -------------------------------------------------------------------------- */

impl IntoInviteKitError for JsonError {
    fn into_invitekit(self) -> InviteKitError {
        InviteKitError::Serialization(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_invitekit())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
