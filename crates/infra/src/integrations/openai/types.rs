//! Chat Completions wire types
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: &'static str,
    pub json_schema: JsonSchema,
}

impl ResponseFormat {
    /// Strict `json_schema` response format
    pub fn strict(name: &'static str, schema: Value) -> Self {
        Self { format_type: "json_schema", json_schema: JsonSchema { name, schema, strict: true } }
    }
}

/// JSON schema wrapper used when `response_format = "json_schema"`.
#[derive(Debug, Serialize)]
pub(crate) struct JsonSchema {
    pub name: &'static str,
    pub schema: Value,
    pub strict: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    /// Absent when the model refuses
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Usage {
    pub total_tokens: u32,
}

/// Schema for the five event fields
pub(crate) fn event_fields_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": { "type": "string" },
            "when": { "type": "string" },
            "location": { "type": "string" },
            "participants": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["title", "description", "when", "location", "participants"],
        "additionalProperties": false
    })
}

pub(crate) fn participants_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "participants": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "email": { "type": ["string", "null"] }
                    },
                    "required": ["name", "email"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["participants"],
        "additionalProperties": false
    })
}

pub(crate) fn end_time_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "end_time": { "type": "string" }
        },
        "required": ["end_time"],
        "additionalProperties": false
    })
}
