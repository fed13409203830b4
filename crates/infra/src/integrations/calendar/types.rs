//! Calendar REST wire envelopes

use serde::Deserialize;

/// Successful responses wrap their payload in `{"request_id", "data"}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    #[serde(default)]
    pub request_id: Option<String>,
    pub data: T,
}

/// Error responses carry `{"request_id", "error": {"type", "message"}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorEnvelope {
    /// Best message for a failed response body, falling back to the raw text
    pub fn describe(body: &str) -> String {
        match serde_json::from_str::<Self>(body) {
            Ok(Self { error: ApiErrorBody { error_type, message } }) => {
                match (error_type, message) {
                    (Some(kind), Some(message)) => format!("{kind}: {message}"),
                    (None, Some(message)) => message,
                    (Some(kind), None) => kind,
                    (None, None) => "unknown error".to_string(),
                }
            }
            Err(_) if body.trim().is_empty() => "empty response body".to_string(),
            Err(_) => body.trim().chars().take(200).collect(),
        }
    }
}
