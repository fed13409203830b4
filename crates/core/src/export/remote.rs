//! Remote submission of event records to the Calendar Service

use std::sync::Arc;

use async_trait::async_trait;
use invitekit_domain::{
    CreateEventRequest, EventRecord, ExportReceipt, InviteKitError, RemoteEventHandle, Result,
};
use tracing::info;

use crate::calendar_ports::CalendarService;
use crate::export_ports::EventExporter;

/// Maps records onto create-event calls.
///
/// Submissions are never retried here; a rejected event surfaces as
/// `RemoteSubmission`.
pub struct RemoteSubmissionAdapter {
    calendar: Arc<dyn CalendarService>,
    calendar_id: String,
}

impl RemoteSubmissionAdapter {
    /// `calendar_id` is the target used by [`EventExporter::export`]
    pub fn new(calendar: Arc<dyn CalendarService>, calendar_id: impl Into<String>) -> Self {
        Self { calendar, calendar_id: calendar_id.into() }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// Submit `record` to `calendar_id`
    ///
    /// # Errors
    /// - `InvalidSpan` if the record's span does not hold
    /// - `RemoteSubmission` when the service rejects the event or returns
    ///   no identifier
    pub async fn submit(&self, record: &EventRecord, calendar_id: &str) -> Result<RemoteEventHandle> {
        record.span().validate()?;

        let request = CreateEventRequest::from(record);
        let created = self.calendar.create_event(calendar_id, &request).await?;

        if created.id.trim().is_empty() {
            return Err(InviteKitError::RemoteSubmission {
                status: None,
                message: "created event has no identifier".to_string(),
            });
        }

        let calendar_id =
            if created.calendar_id.is_empty() { calendar_id.to_string() } else { created.calendar_id };
        info!(event_id = %created.id, %calendar_id, "Event submitted");

        Ok(RemoteEventHandle { id: created.id, calendar_id })
    }
}

#[async_trait]
impl EventExporter for RemoteSubmissionAdapter {
    async fn export(&self, record: &EventRecord) -> Result<ExportReceipt> {
        self.submit(record, &self.calendar_id).await.map(ExportReceipt::Remote)
    }
}
