//! Pipeline orchestration and its state machine

pub mod orchestrator;
pub mod state;

pub use orchestrator::PipelineOrchestrator;
pub use state::{PipelineFailure, PipelineOutcome, PipelineStage, StageTracker};
