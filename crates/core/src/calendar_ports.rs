//! Calendar Service port interfaces

use async_trait::async_trait;
use invitekit_domain::{CalendarDescriptor, CreateEventRequest, EventDescriptor, Result};

/// Trait for calendar backend operations
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// List the calendars visible to the configured account
    async fn list_calendars(&self) -> Result<Vec<CalendarDescriptor>>;

    /// List up to `limit` events of one calendar
    async fn list_events(&self, calendar_id: &str, limit: u32) -> Result<Vec<EventDescriptor>>;

    /// Create an event and return it as stored by the service
    ///
    /// # Errors
    /// `RemoteSubmission` when the service rejects the event.
    async fn create_event(
        &self,
        calendar_id: &str,
        request: &CreateEventRequest,
    ) -> Result<EventDescriptor>;
}
