//! Domain types and models

pub mod calendar;
pub mod event;
pub mod extraction;

pub use calendar::{
    CalendarDescriptor, CreateEventRequest, EventDescriptor, EventWhen, ExportReceipt,
    ParticipantDescriptor, RemoteEventHandle,
};
pub use event::{Contact, EventRecord, EventStatus, ResolvedParticipants, TimeSpan};
pub use extraction::{EndTimeResponse, ParticipantMention, RawExtraction};
