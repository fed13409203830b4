//! Integration tests for the pipeline orchestrator
//!
//! Drives whole runs against scripted doubles: the happy path, the end-time
//! policy, participant partitioning, stage reporting and the deadline and
//! cancellation paths.

mod support;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use invitekit_core::{PipelineOrchestrator, PipelineSettings, PipelineStage};
use invitekit_domain::{
    Contact, EndTimeResponse, ErrorKind, ExportReceipt, InviteKitError, RemoteEventHandle,
};
use serde_json::json;
use support::{fields, MemoryExporter, ScriptedExtraction};
use tokio_util::sync::CancellationToken;

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn utc_settings() -> PipelineSettings {
    PipelineSettings::default().with_timezone(chrono_tz::UTC)
}

fn orchestrator(
    extraction: ScriptedExtraction,
    exporter: MemoryExporter,
    settings: PipelineSettings,
) -> PipelineOrchestrator {
    PipelineOrchestrator::new(Arc::new(extraction), Arc::new(exporter), Arc::new(settings))
}

// ============================================================================
// Happy path
// ============================================================================

/// "Meet Tuesday 9:30am for an hour, reach me at sam@x.io" with Monday
/// 2024-01-01 as reference lands on Tuesday 09:30 UTC for one hour.
#[tokio::test]
async fn test_end_to_end_meeting_with_single_contact() {
    let extraction = ScriptedExtraction::new(
        fields("Meeting with Sam", "Tuesday 9:30am", "unknown"),
        json!({"participants": [{"name": "Sam", "email": "sam@x.io"}]}),
    )
    .with_end_time(EndTimeResponse::Explicit("2024-01-02 10:30:00".into()));
    let exporter = MemoryExporter::default();
    let pipeline = orchestrator(extraction.clone(), exporter.clone(), utc_settings());

    let outcome = pipeline
        .run("Meet Tuesday 9:30am for an hour, reach me at sam@x.io", reference())
        .await
        .unwrap();

    let record = &outcome.record;
    assert_eq!(record.start(), Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap());
    assert_eq!(record.end(), Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap());
    assert_eq!(record.attendees(), [Contact::new("Sam", "sam@x.io")]);
    assert_eq!(record.attendees()[0].to_string(), "Sam <sam@x.io>");
    assert!(outcome.unresolved.is_empty());
    assert_eq!(
        outcome.receipt,
        ExportReceipt::Remote(RemoteEventHandle { id: "evt_1".into(), calendar_id: "primary".into() })
    );
    assert_eq!(
        outcome.stages,
        [
            PipelineStage::Extracting,
            PipelineStage::ResolvingTime,
            PipelineStage::ResolvingParticipants,
            PipelineStage::Assembling,
            PipelineStage::Exporting,
            PipelineStage::Done,
        ]
    );
    assert_eq!(exporter.exported().len(), 1);
    assert_eq!(extraction.calls(), ["fields", "end_time", "participants"]);
}

#[tokio::test]
async fn test_unknown_end_time_defaults_to_one_hour() {
    let extraction = ScriptedExtraction::new(
        fields("Standup", "2024-03-05 09:00", "Room 2"),
        json!({"participants": []}),
    );
    let pipeline = orchestrator(extraction, MemoryExporter::default(), utc_settings());

    let outcome = pipeline.run("standup", reference()).await.unwrap();

    assert_eq!(outcome.record.end() - outcome.record.start(), Duration::seconds(3600));
}

#[tokio::test]
async fn test_end_before_start_falls_back() {
    let extraction = ScriptedExtraction::new(
        fields("Standup", "2024-03-05 09:00", "Room 2"),
        json!({"participants": []}),
    )
    .with_end_time(EndTimeResponse::Explicit("2024-03-05 08:00:00".into()));
    let pipeline = orchestrator(extraction, MemoryExporter::default(), utc_settings());

    let outcome = pipeline.run("standup", reference()).await.unwrap();

    assert_eq!(outcome.record.span().duration(), Duration::hours(1));
}

#[tokio::test]
async fn test_failed_end_time_extraction_is_reported_unchanged() {
    for error in [
        InviteKitError::Auth("extraction key rejected (401)".into()),
        InviteKitError::Network("connection reset".into()),
        InviteKitError::Extraction("model returned garbage".into()),
    ] {
        let extraction = ScriptedExtraction::new(
            fields("Standup", "2024-03-05 09:00", "Room 2"),
            json!({"participants": []}),
        )
        .failing_end_time(error.clone());
        let exporter = MemoryExporter::default();
        let pipeline = orchestrator(extraction.clone(), exporter.clone(), utc_settings());

        let failure = pipeline.run("standup", reference()).await.unwrap_err();

        assert_eq!(failure.stage, PipelineStage::ResolvingTime);
        assert_eq!(failure.error, error);
        assert_eq!(extraction.calls(), ["fields", "end_time"]);
        assert!(exporter.exported().is_empty());
    }
}

#[tokio::test]
async fn test_participants_are_partitioned() {
    let extraction = ScriptedExtraction::new(
        fields("Review", "tomorrow 3pm", "HQ"),
        json!({"participants": [
            {"name": "Alice", "email": null},
            {"name": "Bob", "email": "bob@example.com"}
        ]}),
    );
    let pipeline = orchestrator(extraction, MemoryExporter::default(), utc_settings());

    let outcome = pipeline.run("review with Alice and Bob", reference()).await.unwrap();

    assert_eq!(outcome.record.attendees(), [Contact::new("Bob", "bob@example.com")]);
    assert_eq!(outcome.unresolved, ["Alice"]);
}

#[tokio::test]
async fn test_home_timezone_applies_to_naive_times() {
    let extraction = ScriptedExtraction::new(
        fields("Launch", "8月16日 2024 5:00pm", "HQ"),
        json!({"participants": []}),
    );
    let pipeline =
        orchestrator(extraction, MemoryExporter::default(), PipelineSettings::default());

    let outcome = pipeline.run("launch", reference()).await.unwrap();

    // 17:00 PDT
    assert_eq!(outcome.record.start(), Utc.with_ymd_and_hms(2024, 8, 17, 0, 0, 0).unwrap());
}

// ============================================================================
// Failures keep their stage and kind
// ============================================================================

#[tokio::test]
async fn test_unknown_when_fails_while_resolving_time() {
    let extraction =
        ScriptedExtraction::new(fields("Sync", "unknown", "HQ"), json!({"participants": []}));
    let exporter = MemoryExporter::default();
    let pipeline = orchestrator(extraction, exporter.clone(), utc_settings());

    let failure = pipeline.run("let's sync sometime", reference()).await.unwrap_err();

    assert_eq!(failure.stage, PipelineStage::ResolvingTime);
    assert_eq!(failure.kind(), ErrorKind::TimeParse);
    assert!(exporter.exported().is_empty());
}

#[tokio::test]
async fn test_missing_participant_name_is_format_error() {
    let extraction = ScriptedExtraction::new(
        fields("Sync", "tomorrow 10am", "HQ"),
        json!({"participants": [{"email": "a@example.com"}]}),
    );
    let pipeline = orchestrator(extraction, MemoryExporter::default(), utc_settings());

    let failure = pipeline.run("sync", reference()).await.unwrap_err();

    assert_eq!(failure.stage, PipelineStage::ResolvingParticipants);
    assert_eq!(failure.kind(), ErrorKind::ParticipantFormat);
}

#[tokio::test]
async fn test_strict_mode_fails_while_assembling() {
    let extraction = ScriptedExtraction::new(
        fields("Sync", "tomorrow 10am", "unknown"),
        json!({"participants": []}),
    );
    let pipeline =
        orchestrator(extraction, MemoryExporter::default(), utc_settings().with_strict(true));

    let failure = pipeline.run("sync", reference()).await.unwrap_err();

    assert_eq!(failure.stage, PipelineStage::Assembling);
    assert_eq!(failure.error, InviteKitError::MissingField("location".into()));
}

#[tokio::test]
async fn test_export_rejection_is_reported_unchanged() {
    let rejection = InviteKitError::RemoteSubmission { status: Some(422), message: "nope".into() };
    let extraction = ScriptedExtraction::new(
        fields("Sync", "tomorrow 10am", "HQ"),
        json!({"participants": []}),
    );
    let pipeline =
        orchestrator(extraction, MemoryExporter::failing(rejection.clone()), utc_settings());

    let failure = pipeline.run("sync", reference()).await.unwrap_err();

    assert_eq!(failure.stage, PipelineStage::Exporting);
    assert_eq!(failure.error, rejection);
}

// ============================================================================
// Deadline and cancellation
// ============================================================================

#[tokio::test]
async fn test_deadline_aborts_slow_extraction() {
    let extraction = ScriptedExtraction::new(
        fields("Sync", "tomorrow 10am", "HQ"),
        json!({"participants": []}),
    )
    .with_delay(StdDuration::from_secs(5));
    let settings = utc_settings().with_deadline(StdDuration::from_millis(50));
    let pipeline = orchestrator(extraction, MemoryExporter::default(), settings);

    let failure = pipeline.run("sync", reference()).await.unwrap_err();

    assert_eq!(failure.stage, PipelineStage::Extracting);
    assert_eq!(failure.error, InviteKitError::Timeout(StdDuration::from_millis(50)));
}

#[tokio::test]
async fn test_unrepresentable_deadline_never_fires() {
    let extraction = ScriptedExtraction::new(
        fields("Sync", "tomorrow 10am", "HQ"),
        json!({"participants": []}),
    );
    let settings = utc_settings().with_deadline(StdDuration::MAX);
    let pipeline = orchestrator(extraction, MemoryExporter::default(), settings);

    let outcome = pipeline.run("sync", reference()).await.unwrap();

    assert_eq!(outcome.stages.last(), Some(&PipelineStage::Done));
}

#[tokio::test]
async fn test_cancellation_aborts_pending_call() {
    let extraction = ScriptedExtraction::new(
        fields("Sync", "tomorrow 10am", "HQ"),
        json!({"participants": []}),
    )
    .with_delay(StdDuration::from_secs(5));
    let pipeline = orchestrator(extraction, MemoryExporter::default(), utc_settings());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(StdDuration::from_millis(20)).await;
        trigger.cancel();
    });

    let failure =
        pipeline.run_with_cancellation("sync", reference(), &cancel).await.unwrap_err();

    assert_eq!(failure.kind(), ErrorKind::Cancelled);
    assert_eq!(failure.stage, PipelineStage::Extracting);
}

#[tokio::test]
async fn test_concurrent_runs_share_one_orchestrator() {
    let extraction = ScriptedExtraction::new(
        fields("Sync", "tomorrow 10am", "HQ"),
        json!({"participants": [{"name": "Bob", "email": "bob@example.com"}]}),
    );
    let exporter = MemoryExporter::default();
    let pipeline = Arc::new(orchestrator(extraction, exporter.clone(), utc_settings()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.run("sync", reference()).await })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.record.start(), Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap());
    }
    assert_eq!(exporter.exported().len(), 4);
}
