//! Export adapters
//!
//! Records leave the pipeline either as a create-event call against the
//! Calendar Service or as an iCalendar document. The file-writing adapter
//! lives in the infrastructure crate and reuses [`IcsEncoder`].

pub mod ics;
pub mod remote;

pub use ics::IcsEncoder;
pub use remote::RemoteSubmissionAdapter;
