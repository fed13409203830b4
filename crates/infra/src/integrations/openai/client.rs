//! Chat-completions backed Extraction Service
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use invitekit_core::ExtractionService;
use invitekit_domain::constants::{DEFAULT_EXTRACTION_API_URL, DEFAULT_EXTRACTION_MODEL};
use invitekit_domain::{
    EndTimeResponse, ExtractionConfig, InviteKitError, RawExtraction, Result,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::types::{
    end_time_schema, event_fields_schema, participants_schema, ChatCompletionRequest,
    ChatCompletionResponse, ChatMessage, ResponseFormat,
};
use crate::http::HttpClient;

const TEMPERATURE: f32 = 0.0;

const FIELDS_PROMPT: &str = "Extract the event details based on the following structure: \
title, description, when, location, and participants. Please ensure WHEN is a date or time \
description that can be converted into a standard date format. Keep dates and times exactly as \
the text states them, without converting timezones. Missing parts fill with 'unknown'.";

const PARTICIPANTS_PROMPT: &str = "List every person mentioned as attending the meeting. \
For each give the name as written and the email address if the text contains one for that \
person, otherwise null. Never invent email addresses.";

const END_TIME_PROMPT: &str = "If the text states when the meeting ends, or how long it lasts, \
return the end as end_time in the format YYYY-MM-DD HH:MM:SS, in the same local time as the \
text. Otherwise return end_time as 'unknown'.";

/// Extraction Service backed by an OpenAI-compatible chat-completions API.
///
/// Each operation is one request with a strict JSON-schema response format
/// at temperature 0.
pub struct OpenAiExtractionClient {
    http_client: HttpClient,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAiExtractionClient {
    pub fn new(api_key: impl Into<String>, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            model: DEFAULT_EXTRACTION_MODEL.to_string(),
            api_url: DEFAULT_EXTRACTION_API_URL.to_string(),
        }
    }

    /// Client configured from the extraction section
    ///
    /// # Errors
    /// `Config` when the key is blank, or when the HTTP client cannot be
    /// built.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(InviteKitError::Config("extraction api_key is empty".into()));
        }
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .max_attempts(config.max_attempts as usize)
            .build()?;

        Ok(Self::new(config.api_key.clone(), http_client)
            .with_model(config.model.clone())
            .with_api_url(config.api_url.clone()))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one completion request and return the raw message content
    async fn complete(
        &self,
        system: String,
        user: &str,
        schema_name: &'static str,
        schema: Value,
    ) -> Result<String> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: TEMPERATURE,
            response_format: ResponseFormat::strict(schema_name, schema),
        };

        let request = self
            .http_client
            .request(Method::POST, &self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload);

        let response = self.http_client.send(request).await?;
        let status = response.status();
        debug!(status = status.as_u16(), schema = schema_name, "Received extraction response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => InviteKitError::Auth(format!("extraction key rejected ({status})")),
                code => InviteKitError::Extraction(format!("HTTP {code}: {}", truncate(&body))),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InviteKitError::Extraction(format!("invalid completion body: {e}")))?;

        if let Some(usage) = &completion.usage {
            debug!(tokens = usage.total_tokens, schema = schema_name, "Completion usage");
        }

        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| InviteKitError::Extraction("completion contained no choices".into()))?;

        match (message.content, message.refusal) {
            (Some(content), _) => Ok(content),
            (None, Some(refusal)) => {
                Err(InviteKitError::Extraction(format!("model refused: {refusal}")))
            }
            (None, None) => Err(InviteKitError::Extraction("completion had no content".into())),
        }
    }
}

#[async_trait]
impl ExtractionService for OpenAiExtractionClient {
    async fn extract_fields(
        &self,
        description: &str,
        reference: DateTime<Utc>,
    ) -> Result<RawExtraction> {
        info!(model = %self.model, "Requesting field extraction");
        let content = self
            .complete(with_reference(FIELDS_PROMPT, reference), description, "event_fields", event_fields_schema())
            .await?;
        parse_content(&content)
    }

    async fn extract_participants(&self, description: &str) -> Result<Value> {
        info!(model = %self.model, "Requesting participant extraction");
        let content = self
            .complete(PARTICIPANTS_PROMPT.to_string(), description, "participants", participants_schema())
            .await?;
        parse_content(&content)
    }

    async fn extract_end_time(
        &self,
        description: &str,
        reference: DateTime<Utc>,
    ) -> Result<EndTimeResponse> {
        info!(model = %self.model, "Requesting end time extraction");
        let content = self
            .complete(with_reference(END_TIME_PROMPT, reference), description, "end_time", end_time_schema())
            .await?;

        if content.trim().eq_ignore_ascii_case("unknown") {
            return Ok(EndTimeResponse::Unknown);
        }
        parse_content(&content)
    }
}

fn with_reference(prompt: &str, reference: DateTime<Utc>) -> String {
    format!(
        "{prompt} The current time is {}.",
        reference.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

fn parse_content<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| {
        InviteKitError::Extraction(format!("malformed content: {e}. Content: {}", truncate(content)))
    })
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 200;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
