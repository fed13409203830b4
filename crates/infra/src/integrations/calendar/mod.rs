//! Calendar Service integration
//!
//! [`CalendarApiClient`] implements the core `CalendarService` port. List
//! calls map failures to `Auth`/`Network`; create calls map any rejection
//! to `RemoteSubmission` and are not retried unless configured.

mod client;
mod types;

pub use client::CalendarApiClient;
