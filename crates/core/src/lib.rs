//! # InviteKit Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Time expression resolution (`TimeResolver`)
//! - Participant resolution (`ParticipantResolver`)
//! - Event assembly (`EventAssembler`)
//! - iCalendar encoding and remote submission
//! - The pipeline orchestrator and its state machine
//! - Port interfaces (traits) for the Extraction and Calendar services
//!
//! ## Architecture Principles
//! - Depends only on `invitekit-common` and `invitekit-domain`
//! - No HTTP, file system or platform code
//! - All external services via traits
//! - Pure, testable business logic

pub mod assembler;
pub mod export;
pub mod participants;
pub mod pipeline;
pub mod settings;
pub mod time;

// Ports
pub mod calendar_ports;
pub mod export_ports;
pub mod extraction_ports;

pub use assembler::EventAssembler;
pub use calendar_ports::CalendarService;
pub use export::{IcsEncoder, RemoteSubmissionAdapter};
pub use export_ports::EventExporter;
pub use extraction_ports::ExtractionService;
pub use participants::ParticipantResolver;
pub use pipeline::{
    PipelineFailure, PipelineOrchestrator, PipelineOutcome, PipelineStage, StageTracker,
};
pub use settings::PipelineSettings;
pub use time::TimeResolver;
