//! Export port interfaces

use async_trait::async_trait;
use invitekit_domain::{EventRecord, ExportReceipt, Result};

/// Trait for delivering a finished record somewhere
#[async_trait]
pub trait EventExporter: Send + Sync {
    /// Export one record
    async fn export(&self, record: &EventRecord) -> Result<ExportReceipt>;
}
