//! # InviteKit Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The retrying HTTP client
//! - The chat-completions Extraction Service client
//! - The Calendar Service REST client
//! - The `.ics` file exporter
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `invitekit-core`
//! - Contains all "impure" code (network, file system, environment)

pub mod config;
pub mod errors;
pub mod export;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use errors::InfraError;
pub use export::FileExportAdapter;
pub use http::HttpClient;
pub use integrations::{CalendarApiClient, OpenAiExtractionClient};
