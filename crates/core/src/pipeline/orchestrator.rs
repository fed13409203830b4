//! Pipeline orchestration
//!
//! One run walks `Extracting → ResolvingTime → ResolvingParticipants →
//! Assembling → Exporting → Done`, stopping at the first error. External
//! calls run under the configured deadline and abort on cancellation.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use invitekit_domain::{InviteKitError, Result, TimeSpan};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::state::{PipelineFailure, PipelineOutcome, PipelineStage, StageTracker};
use crate::assembler::EventAssembler;
use crate::export_ports::EventExporter;
use crate::extraction_ports::ExtractionService;
use crate::participants::ParticipantResolver;
use crate::settings::PipelineSettings;
use crate::time::TimeResolver;

/// Per-run guard for the deadline and cancellation token
struct RunGuard<'a> {
    cancel: &'a CancellationToken,
    deadline: Option<(Instant, std::time::Duration)>,
}

impl<'a> RunGuard<'a> {
    /// A deadline too far out to represent as an `Instant` never fires
    fn new(cancel: &'a CancellationToken, deadline: Option<std::time::Duration>) -> Self {
        let deadline =
            deadline.and_then(|limit| Instant::now().checked_add(limit).map(|at| (at, limit)));
        Self { cancel, deadline }
    }

    /// Fail fast between stages
    fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(InviteKitError::Cancelled);
        }
        match self.deadline {
            Some((at, limit)) if Instant::now() >= at => Err(InviteKitError::Timeout(limit)),
            _ => Ok(()),
        }
    }

    /// Run an external call under the remaining deadline, aborting on cancel
    async fn call<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let bounded = async {
            match self.deadline {
                Some((at, limit)) => tokio::time::timeout_at(at, call)
                    .await
                    .map_err(|_| InviteKitError::Timeout(limit))?,
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(InviteKitError::Cancelled),
            result = bounded => result,
        }
    }
}

/// Sequences extraction, resolution, assembly and export for one input
pub struct PipelineOrchestrator {
    extraction: Arc<dyn ExtractionService>,
    exporter: Arc<dyn EventExporter>,
    settings: Arc<PipelineSettings>,
    time: TimeResolver,
    participants: ParticipantResolver,
    assembler: EventAssembler,
}

impl PipelineOrchestrator {
    pub fn new(
        extraction: Arc<dyn ExtractionService>,
        exporter: Arc<dyn EventExporter>,
        settings: Arc<PipelineSettings>,
    ) -> Self {
        Self {
            time: TimeResolver::from_settings(&settings),
            participants: ParticipantResolver::new(),
            assembler: EventAssembler::new(settings.strict),
            extraction,
            exporter,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn time_resolver(&self) -> &TimeResolver {
        &self.time
    }

    /// Run the pipeline for one description
    ///
    /// # Errors
    /// A [`PipelineFailure`] naming the stage that failed and carrying the
    /// original error.
    pub async fn run(
        &self,
        description: &str,
        reference: DateTime<Utc>,
    ) -> std::result::Result<PipelineOutcome, PipelineFailure> {
        self.run_with_cancellation(description, reference, &CancellationToken::new()).await
    }

    /// Run the pipeline, aborting pending external calls when `cancel` fires
    #[instrument(skip_all, fields(reference = %reference, chars = description.chars().count()))]
    pub async fn run_with_cancellation(
        &self,
        description: &str,
        reference: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> std::result::Result<PipelineOutcome, PipelineFailure> {
        let guard = RunGuard::new(cancel, self.settings.deadline);
        let mut tracker = StageTracker::new();

        match self.execute(description, reference, &guard, &mut tracker).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let stage = tracker.current();
                error!(%stage, kind = %err.kind(), error = %err, "Pipeline failed");
                if let Err(transition) = tracker.advance(PipelineStage::Failed) {
                    warn!(error = %transition, "Could not record failed state");
                }
                Err(PipelineFailure::new(stage, err))
            }
        }
    }

    async fn execute(
        &self,
        description: &str,
        reference: DateTime<Utc>,
        guard: &RunGuard<'_>,
        tracker: &mut StageTracker,
    ) -> Result<PipelineOutcome> {
        info!(stage = %tracker.current(), "Extracting event fields");
        let raw = guard.call(self.extraction.extract_fields(description, reference)).await?;
        debug!(title = %raw.title, when = %raw.when, "Extracted fields");

        self.enter(tracker, guard, PipelineStage::ResolvingTime)?;
        let start = self.time.resolve(&raw.when, reference)?;
        let end = self.end_with(guard, description, start, reference).await?;
        let span = TimeSpan { start, end };

        self.enter(tracker, guard, PipelineStage::ResolvingParticipants)?;
        let payload = guard.call(self.extraction.extract_participants(description)).await?;
        let participants = self.participants.resolve(&payload)?;
        if !participants.unresolved().is_empty() {
            warn!(
                unresolved = ?participants.unresolved(),
                "Participants without a valid email are left out of the event"
            );
        }

        self.enter(tracker, guard, PipelineStage::Assembling)?;
        let record = self.assembler.assemble(&raw, &participants, span)?;

        self.enter(tracker, guard, PipelineStage::Exporting)?;
        let receipt = guard.call(self.exporter.export(&record)).await?;

        tracker.advance(PipelineStage::Done)?;
        info!(start = %record.start(), end = %record.end(), "Pipeline finished");

        Ok(PipelineOutcome {
            record,
            receipt,
            unresolved: participants.unresolved().iter().cloned().collect(),
            stages: tracker.visited().to_vec(),
        })
    }

    fn enter(
        &self,
        tracker: &mut StageTracker,
        guard: &RunGuard<'_>,
        stage: PipelineStage,
    ) -> Result<()> {
        guard.check()?;
        tracker.advance(stage)?;
        info!(%stage, "Entering stage");
        Ok(())
    }

    /// Ask the Extraction Service for an explicit end, then apply the
    /// end-time policy.
    ///
    /// # Errors
    /// Whatever the Extraction Service call fails with. An `unknown`,
    /// unparseable or non-positive end is not an error and falls back to the
    /// default duration.
    pub async fn resolve_end(
        &self,
        description: &str,
        start: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        let cancel = CancellationToken::new();
        let guard = RunGuard::new(&cancel, self.settings.deadline);
        self.end_with(&guard, description, start, reference).await
    }

    async fn end_with(
        &self,
        guard: &RunGuard<'_>,
        description: &str,
        start: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        let response = guard.call(self.extraction.extract_end_time(description, reference)).await?;
        Ok(self.time.resolve_end(&response, start, reference))
    }
}
