//! Inbound ports - Interfaces that the application exposes to the outside world

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;

use crate::domain::entities::{CharacterSheet, PipelineRun, PipelineStage};
use crate::domain::rules::RulesError;
use crate::domain::value_objects::CharacterId;

/// Errors surfaced by the sheet use cases
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// The definition is missing a field every stage needs. Raised before
    /// any stage runs.
    #[error("Character {character_id} is missing or has an invalid {field}")]
    Validation {
        character_id: CharacterId,
        field: &'static str,
    },
    #[error("Character definition not found: {0}")]
    NotFound(CharacterId),
    #[error("Stage {stage} failed: {source}")]
    StageComputation {
        stage: PipelineStage,
        source: RulesError,
    },
    /// The stage code panicked. The run is failed instead of left hanging.
    #[error("Stage {stage} aborted unexpectedly")]
    StagePanicked { stage: PipelineStage },
    /// The run was superseded and no newer run exists to follow
    #[error("Sheet generation was cancelled")]
    Cancelled,
    #[error("Repository error: {0}")]
    Repository(String),
}

pub type RunOutcome = Result<Arc<CharacterSheet>, PipelineError>;

/// What subscribers of a run observe: the run itself and, once terminal,
/// its outcome
#[derive(Debug, Clone)]
pub struct RunState {
    pub run: PipelineRun,
    pub outcome: Option<RunOutcome>,
}

impl RunState {
    pub fn new(run: PipelineRun) -> Self {
        Self { run, outcome: None }
    }
}

/// Non-blocking view of a character's sheet
#[derive(Debug, Clone)]
pub enum SheetLookup {
    Ready(Arc<CharacterSheet>),
    Pending(PipelineRun),
    NotFound,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub runs_started: u64,
    pub runs_succeeded: u64,
    pub runs_failed: u64,
    pub runs_cancelled: u64,
    pub stages_executed: u64,
}

/// Sheet generation use cases
#[async_trait]
pub trait CharacterSheetUseCase: Send + Sync {
    /// Cancel any in-flight run for the character and generate a fresh sheet
    async fn generate_character_sheet(&self, id: CharacterId) -> RunOutcome;

    /// Return the cached sheet, joining or starting a run when there is none
    async fn get_character_sheet(&self, id: CharacterId) -> RunOutcome;

    async fn peek_character_sheet(&self, id: CharacterId) -> Result<SheetLookup, PipelineError>;

    /// Latest run for the character, terminal or not
    async fn progress(&self, id: CharacterId) -> Option<PipelineRun>;

    async fn subscribe(&self, id: CharacterId) -> Option<watch::Receiver<RunState>>;

    fn stats(&self) -> PipelineStats;
}
