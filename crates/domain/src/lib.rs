//! # InviteKit Domain
//!
//! Data types shared by every InviteKit crate.
//!
//! This crate contains:
//! - Extraction payloads (`RawExtraction`, `ParticipantMention`,
//!   `EndTimeResponse`)
//! - The canonical event record (`EventRecord`, `TimeSpan`, `Contact`)
//! - Calendar service descriptors and request shapes
//! - Configuration structures
//! - The error taxonomy and Result alias
//!
//! ## Architecture
//! - No dependencies on other InviteKit crates
//! - Only external dependencies allowed
//! - Pure data and invariants, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
