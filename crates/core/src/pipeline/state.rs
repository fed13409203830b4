//! Pipeline state machine

use invitekit_domain::{
    impl_domain_status_conversions, ErrorKind, EventRecord, ExportReceipt, InviteKitError, Result,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stages of one pipeline run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Extracting,
    ResolvingTime,
    ResolvingParticipants,
    Assembling,
    Exporting,
    Done,
    Failed,
}

impl_domain_status_conversions!(PipelineStage {
    Extracting => "extracting",
    ResolvingTime => "resolving_time",
    ResolvingParticipants => "resolving_participants",
    Assembling => "assembling",
    Exporting => "exporting",
    Done => "done",
    Failed => "failed",
});

impl PipelineStage {
    /// The stage that follows on success; `None` for terminal stages
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Extracting => Some(Self::ResolvingTime),
            Self::ResolvingTime => Some(Self::ResolvingParticipants),
            Self::ResolvingParticipants => Some(Self::Assembling),
            Self::Assembling => Some(Self::Exporting),
            Self::Exporting => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Legal moves: forward by one, or to `Failed` from any live stage
    pub fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Failed || self.next() == Some(to)
    }
}

/// Records the stages one run passes through and rejects illegal moves
#[derive(Debug, Clone)]
pub struct StageTracker {
    visited: Vec<PipelineStage>,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StageTracker {
    pub fn new() -> Self {
        Self { visited: vec![PipelineStage::Extracting] }
    }

    pub fn current(&self) -> PipelineStage {
        self.visited.last().copied().unwrap_or(PipelineStage::Extracting)
    }

    /// Move to `to`
    ///
    /// # Errors
    /// `Internal` for a transition the state machine does not allow.
    pub fn advance(&mut self, to: PipelineStage) -> Result<()> {
        let from = self.current();
        if !from.can_transition_to(to) {
            return Err(InviteKitError::Internal(format!(
                "illegal pipeline transition {from} -> {to}"
            )));
        }
        self.visited.push(to);
        Ok(())
    }

    pub fn visited(&self) -> &[PipelineStage] {
        &self.visited
    }

    pub fn into_visited(self) -> Vec<PipelineStage> {
        self.visited
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub record: EventRecord,
    pub receipt: ExportReceipt,
    /// Participants mentioned without a usable email
    pub unresolved: Vec<String>,
    pub stages: Vec<PipelineStage>,
}

/// A failed run: where it stopped and the originating error, unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("pipeline failed while {stage}: {error}")]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    pub error: InviteKitError,
}

impl PipelineFailure {
    pub fn new(stage: PipelineStage, error: InviteKitError) -> Self {
        Self { stage, error }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn into_error(self) -> InviteKitError {
        self.error
    }
}
