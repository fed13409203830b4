//! Shared test helpers for `invitekit-core` integration tests.
//!
//! Lightweight doubles for the Extraction Service and the exporter so that
//! pipeline tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use invitekit_core::{EventExporter, ExtractionService};
use invitekit_domain::{
    EndTimeResponse, EventRecord, ExportReceipt, InviteKitError, RawExtraction,
    RemoteEventHandle, Result as DomainResult,
};
use serde_json::Value;

/// Extraction double that returns canned payloads, optionally after a delay.
#[derive(Clone)]
pub struct ScriptedExtraction {
    pub fields: RawExtraction,
    pub participants: Value,
    pub end_time: EndTimeResponse,
    pub delay: Option<Duration>,
    pub end_time_error: Option<InviteKitError>,
    pub calls: Arc<Mutex<Vec<&'static str>>>,
}

impl ScriptedExtraction {
    pub fn new(fields: RawExtraction, participants: Value) -> Self {
        Self {
            fields,
            participants,
            end_time: EndTimeResponse::Unknown,
            delay: None,
            end_time_error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_end_time(mut self, end_time: EndTimeResponse) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_end_time(mut self, error: InviteKitError) -> Self {
        self.end_time_error = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    async fn pause(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ExtractionService for ScriptedExtraction {
    async fn extract_fields(
        &self,
        _description: &str,
        _reference: DateTime<Utc>,
    ) -> DomainResult<RawExtraction> {
        self.pause("fields").await;
        Ok(self.fields.clone())
    }

    async fn extract_participants(&self, _description: &str) -> DomainResult<Value> {
        self.pause("participants").await;
        Ok(self.participants.clone())
    }

    async fn extract_end_time(
        &self,
        _description: &str,
        _reference: DateTime<Utc>,
    ) -> DomainResult<EndTimeResponse> {
        self.pause("end_time").await;
        if let Some(error) = &self.end_time_error {
            return Err(error.clone());
        }
        Ok(self.end_time.clone())
    }
}

/// Exporter double that keeps every record it receives.
#[derive(Default, Clone)]
pub struct MemoryExporter {
    pub exported: Arc<Mutex<Vec<EventRecord>>>,
    pub fail_with: Option<InviteKitError>,
}

impl MemoryExporter {
    pub fn failing(error: InviteKitError) -> Self {
        Self { fail_with: Some(error), ..Default::default() }
    }

    pub fn exported(&self) -> Vec<EventRecord> {
        self.exported.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventExporter for MemoryExporter {
    async fn export(&self, record: &EventRecord) -> DomainResult<ExportReceipt> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        let mut exported = self.exported.lock().unwrap();
        exported.push(record.clone());
        Ok(ExportReceipt::Remote(RemoteEventHandle {
            id: format!("evt_{}", exported.len()),
            calendar_id: "primary".into(),
        }))
    }
}

/// Extraction payload with every field set
pub fn fields(title: &str, when: &str, location: &str) -> RawExtraction {
    RawExtraction {
        title: title.into(),
        description: "unknown".into(),
        when: when.into(),
        location: location.into(),
        participants: "unknown".into(),
    }
}
