//! Calendar REST client
//!
//! Grant-scoped endpoints under `{base}/grants/{grant_id}` with bearer
//! authentication.

use std::time::Duration;

use async_trait::async_trait;
use invitekit_core::CalendarService;
use invitekit_domain::{
    CalendarConfig, CalendarDescriptor, CreateEventRequest, EventDescriptor, InviteKitError,
    Result,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::types::{ApiEnvelope, ApiErrorEnvelope};
use crate::http::HttpClient;

/// Calendar Service over the grant-scoped REST API
#[derive(Clone)]
pub struct CalendarApiClient {
    http_client: HttpClient,
    api_base: String,
    grant_id: String,
    api_key: String,
}

impl CalendarApiClient {
    pub fn new(
        http_client: HttpClient,
        api_base: impl Into<String>,
        grant_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            grant_id: grant_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Client configured from the calendar section
    ///
    /// # Errors
    /// `Config` when the grant or key is missing.
    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(InviteKitError::Config(
                "calendar grant_id and api_key are required".into(),
            ));
        }
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .max_attempts(config.max_attempts as usize)
            .build()?;

        Ok(Self::new(http_client, &config.api_base, &config.grant_id, &config.api_key))
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/grants/{}/{resource}", self.api_base, self.grant_id)
    }

    fn request(&self, method: Method, resource: &str) -> RequestBuilder {
        self.http_client.request(method, self.endpoint(resource)).bearer_auth(&self.api_key)
    }

    /// Send a read request; failures are `Auth` or `Network`
    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.http_client.send(builder).await?;
        let status = response.status();

        if !status.is_success() {
            let message = ApiErrorEnvelope::describe(&response.text().await.unwrap_or_default());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    InviteKitError::Auth(format!("calendar credentials rejected ({status}): {message}"))
                }
                _ => InviteKitError::Network(format!("calendar API returned {status}: {message}")),
            });
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| InviteKitError::Network(format!("malformed calendar response: {e}")))?;
        debug!(request_id = envelope.request_id.as_deref().unwrap_or("-"), "Calendar response");
        Ok(envelope.data)
    }
}

#[async_trait]
impl CalendarService for CalendarApiClient {
    async fn list_calendars(&self) -> Result<Vec<CalendarDescriptor>> {
        info!(grant_id = %self.grant_id, "Listing calendars");
        self.fetch(self.request(Method::GET, "calendars")).await
    }

    async fn list_events(&self, calendar_id: &str, limit: u32) -> Result<Vec<EventDescriptor>> {
        info!(calendar_id, limit, "Listing events");
        let builder = self
            .request(Method::GET, "events")
            .query(&[("calendar_id", calendar_id.to_string()), ("limit", limit.to_string())]);
        self.fetch(builder).await
    }

    async fn create_event(
        &self,
        calendar_id: &str,
        request: &CreateEventRequest,
    ) -> Result<EventDescriptor> {
        info!(calendar_id, participants = request.participants.len(), "Creating event");
        let builder = self
            .request(Method::POST, "events")
            .query(&[("calendar_id", calendar_id)])
            .json(request);

        let response = self.http_client.send(builder).await?;
        let status = response.status();

        if !status.is_success() {
            let message = ApiErrorEnvelope::describe(&response.text().await.unwrap_or_default());
            return Err(InviteKitError::RemoteSubmission { status: Some(status.as_u16()), message });
        }

        let envelope: ApiEnvelope<EventDescriptor> =
            response.json().await.map_err(|e| InviteKitError::RemoteSubmission {
                status: Some(status.as_u16()),
                message: format!("malformed create response: {e}"),
            })?;

        info!(event_id = %envelope.data.id, "Event created");
        Ok(envelope.data)
    }
}
