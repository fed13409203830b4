//! OpenAI-compatible Extraction Service
//!
//! [`OpenAiExtractionClient`] implements the core `ExtractionService` port
//! over the Chat Completions API.
//!
//! # API Integration
//!
//! - Model: `gpt-4o-mini` (configurable via `with_model()`)
//! - Temperature: 0
//! - Response format: strict `json_schema`, one schema per operation
//!
//! # Error Handling
//!
//! - **Transport failures**: `Network`, retried by `HttpClient`
//! - **401/403**: `Auth`
//! - **Other non-success statuses**: `Extraction`
//! - **Unparseable content or refusals**: `Extraction`
//!
//! ```no_run
//! use invitekit_core::ExtractionService;
//! use invitekit_infra::http::HttpClient;
//! use invitekit_infra::integrations::openai::OpenAiExtractionClient;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiExtractionClient::new(std::env::var("OPENAI_API_KEY")?, HttpClient::new()?);
//! let fields = client.extract_fields("Lunch with Ana tomorrow at noon", chrono::Utc::now()).await?;
//! println!("{}", fields.when);
//! # Ok(())
//! # }
//! ```
mod client;
mod types;

pub use client::OpenAiExtractionClient;
