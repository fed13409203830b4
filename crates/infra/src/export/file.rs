//! `.ics` file export
//!
//! Bytes are written to a temporary file in the destination directory and
//! renamed over the destination, so readers see either the old file or the
//! complete new one.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use invitekit_core::{EventExporter, IcsEncoder};
use invitekit_domain::{EventRecord, ExportReceipt, InviteKitError, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::errors::InfraError;

/// Exports records as iCalendar files
#[derive(Debug, Clone)]
pub struct FileExportAdapter {
    destination: PathBuf,
    encoder: IcsEncoder,
}

impl FileExportAdapter {
    /// Adapter whose [`EventExporter::export`] writes to `destination`
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self { destination: destination.into(), encoder: IcsEncoder::new() }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Encode `record` and write it atomically to `destination`
    ///
    /// # Errors
    /// `InvalidSpan` if the record's span does not hold; `Serialization` for
    /// any I/O failure, in which case the destination is left untouched.
    pub async fn export_to(&self, record: &EventRecord, destination: &Path) -> Result<()> {
        let calendar = self.encoder.encode(record)?;
        let destination = destination.to_path_buf();

        let written = destination.clone();
        tokio::task::spawn_blocking(move || write_atomically(&written, calendar.as_bytes()))
            .await
            .map_err(|e| InviteKitError::Internal(format!("export task failed: {e}")))??;

        info!(path = %destination.display(), "Exported event to file");
        Ok(())
    }
}

#[async_trait]
impl EventExporter for FileExportAdapter {
    async fn export(&self, record: &EventRecord) -> Result<ExportReceipt> {
        self.export_to(record, &self.destination).await?;
        Ok(ExportReceipt::File { path: self.destination.clone() })
    }
}

fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<()> {
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(directory).map_err(InfraError::from)?;
    staged.write_all(bytes).map_err(InfraError::from)?;
    staged.as_file().sync_all().map_err(InfraError::from)?;
    // Dropping the temp file on error removes it.
    staged.persist(destination).map_err(|e| InfraError::from(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use invitekit_domain::{Contact, TimeSpan};
    use tempfile::TempDir;

    use super::*;

    fn record() -> EventRecord {
        let span = TimeSpan::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap(),
        )
        .unwrap();
        EventRecord::new(
            "Sync".into(),
            "unknown".into(),
            "HQ".into(),
            span,
            vec![Contact::new("Sam", "sam@x.io")],
            true,
        )
    }

    #[tokio::test]
    async fn writes_calendar_and_returns_file_receipt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sync.ics");
        let adapter = FileExportAdapter::new(&path);

        let receipt = adapter.export(&record()).await.unwrap();

        assert_eq!(receipt, ExportReceipt::File { path: path.clone() });
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(written.contains("DTSTART:20240102T093000Z\r\n"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sync.ics");
        std::fs::write(&path, "stale").unwrap();

        FileExportAdapter::new(&path).export(&record()).await.unwrap();

        assert!(std::fs::read_to_string(&path).unwrap().contains("SUMMARY:Sync"));
    }

    #[tokio::test]
    async fn missing_directory_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("sync.ics");

        let result = FileExportAdapter::new(&path).export(&record()).await;

        assert!(matches!(result, Err(InviteKitError::Serialization(_))));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn invalid_span_is_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.ics");
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        let mut json = serde_json::to_value(record()).unwrap();
        json["span"]["start"] = serde_json::json!(start);
        json["span"]["end"] = serde_json::json!(start);
        let broken: EventRecord = serde_json::from_value(json).unwrap();

        let result = FileExportAdapter::new(&path).export(&broken).await;

        assert!(matches!(result, Err(InviteKitError::InvalidSpan { .. })));
        assert!(!path.exists());
    }
}
