//! Extraction Service port interfaces
//!
//! The Extraction Service does the semantic work of reading free text. The
//! core only depends on the shapes it returns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use invitekit_domain::{EndTimeResponse, RawExtraction, Result};

/// Trait for semantic field extraction from meeting descriptions
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Extract title, description, when, location and participants.
    ///
    /// Undeterminable fields hold the `"unknown"` sentinel.
    async fn extract_fields(
        &self,
        description: &str,
        reference: DateTime<Utc>,
    ) -> Result<RawExtraction>;

    /// Extract participant mentions as
    /// `{"participants": [{"name": .., "email": ..|null}]}`.
    ///
    /// The payload is returned untouched so that format problems surface
    /// from participant resolution.
    async fn extract_participants(&self, description: &str) -> Result<serde_json::Value>;

    /// Extract an explicit end time, if the description states one
    async fn extract_end_time(
        &self,
        description: &str,
        reference: DateTime<Utc>,
    ) -> Result<EndTimeResponse>;
}
