//! Pipeline run - progress and outcome of one sheet generation attempt

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, RunId};

/// Position of a run in the stage sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    CalculatingAbilities,
    CalculatingBaseStats,
    GeneratingSkills,
    GeneratingFeatures,
    GeneratingLanguages,
    GeneratingProficiencies,
    GeneratingAttacks,
    Complete,
    Failed,
    Cancelled,
}

impl PipelineStage {
    /// The seven computation stages in execution order
    pub const COMPUTATION_ORDER: [PipelineStage; 7] = [
        PipelineStage::CalculatingAbilities,
        PipelineStage::CalculatingBaseStats,
        PipelineStage::GeneratingSkills,
        PipelineStage::GeneratingFeatures,
        PipelineStage::GeneratingLanguages,
        PipelineStage::GeneratingProficiencies,
        PipelineStage::GeneratingAttacks,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineStage::Complete | PipelineStage::Failed | PipelineStage::Cancelled
        )
    }

    /// The stage that follows this one on the success path
    pub fn next(&self) -> Option<PipelineStage> {
        use PipelineStage::*;
        match self {
            Idle => Some(CalculatingAbilities),
            CalculatingAbilities => Some(CalculatingBaseStats),
            CalculatingBaseStats => Some(GeneratingSkills),
            GeneratingSkills => Some(GeneratingFeatures),
            GeneratingFeatures => Some(GeneratingLanguages),
            GeneratingLanguages => Some(GeneratingProficiencies),
            GeneratingProficiencies => Some(GeneratingAttacks),
            GeneratingAttacks => Some(Complete),
            Complete | Failed | Cancelled => None,
        }
    }

    /// Transition table: one step forward, or to Failed/Cancelled from any
    /// non-terminal stage
    pub fn can_advance_to(&self, to: PipelineStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        match to {
            PipelineStage::Failed | PipelineStage::Cancelled => true,
            other => self.next() == Some(other),
        }
    }

    /// Progress label for UI displays
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "Waiting to start",
            PipelineStage::CalculatingAbilities => "Calculating ability scores...",
            PipelineStage::CalculatingBaseStats => "Calculating combat stats...",
            PipelineStage::GeneratingSkills => "Generating skills...",
            PipelineStage::GeneratingFeatures => "Generating features and traits...",
            PipelineStage::GeneratingLanguages => "Generating languages...",
            PipelineStage::GeneratingProficiencies => "Generating proficiencies...",
            PipelineStage::GeneratingAttacks => "Generating attacks...",
            PipelineStage::Complete => "Complete",
            PipelineStage::Failed => "Failed",
            PipelineStage::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::CalculatingAbilities => "abilities",
            PipelineStage::CalculatingBaseStats => "combat_stats",
            PipelineStage::GeneratingSkills => "skills",
            PipelineStage::GeneratingFeatures => "features",
            PipelineStage::GeneratingLanguages => "languages",
            PipelineStage::GeneratingProficiencies => "proficiencies",
            PipelineStage::GeneratingAttacks => "attacks",
            PipelineStage::Complete => "complete",
            PipelineStage::Failed => "failed",
            PipelineStage::Cancelled => "cancelled",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

/// Error recorded on a failed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    /// Stage that was executing when the run failed
    pub stage: PipelineStage,
    pub message: String,
}

/// Observable state of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: RunId,
    pub character_id: CharacterId,
    pub stage: PipelineStage,
    pub error: Option<RunError>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rejected transition; the run is left unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid pipeline transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: PipelineStage,
    pub to: PipelineStage,
}

impl PipelineRun {
    pub fn new(character_id: CharacterId) -> Self {
        let now = Utc::now();
        Self {
            id: RunId::new(),
            character_id,
            stage: PipelineStage::Idle,
            error: None,
            started_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> RunStatus {
        match self.stage {
            PipelineStage::Idle => RunStatus::Idle,
            PipelineStage::Complete => RunStatus::Succeeded,
            PipelineStage::Failed => RunStatus::Failed,
            PipelineStage::Cancelled => RunStatus::Cancelled,
            _ => RunStatus::Running,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Move to `to` if the transition table allows it
    pub fn advance(&mut self, to: PipelineStage) -> Result<(), InvalidTransition> {
        if !self.stage.can_advance_to(to) {
            return Err(InvalidTransition {
                from: self.stage,
                to,
            });
        }
        self.stage = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Fail the run, recording the stage that was executing
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), InvalidTransition> {
        let stage = self.stage;
        self.advance(PipelineStage::Failed)?;
        self.error = Some(RunError {
            stage,
            message: message.into(),
        });
        Ok(())
    }

    /// Cancellation never records an error
    pub fn cancel(&mut self) -> Result<(), InvalidTransition> {
        self.advance(PipelineStage::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path_walks_every_stage() {
        let mut run = PipelineRun::new(CharacterId::new());
        assert_eq!(run.status(), RunStatus::Idle);
        for stage in PipelineStage::COMPUTATION_ORDER {
            run.advance(stage).unwrap();
            assert_eq!(run.status(), RunStatus::Running);
        }
        run.advance(PipelineStage::Complete).unwrap();
        assert_eq!(run.status(), RunStatus::Succeeded);
        assert!(run.is_terminal());
    }

    #[test]
    fn test_cannot_skip_or_go_backward() {
        let mut run = PipelineRun::new(CharacterId::new());
        assert!(run.advance(PipelineStage::GeneratingSkills).is_err());
        run.advance(PipelineStage::CalculatingAbilities).unwrap();
        run.advance(PipelineStage::CalculatingBaseStats).unwrap();
        let err = run.advance(PipelineStage::CalculatingAbilities).unwrap_err();
        assert_eq!(err.from, PipelineStage::CalculatingBaseStats);
        assert_eq!(run.stage, PipelineStage::CalculatingBaseStats);
    }

    #[test]
    fn test_fail_records_offending_stage() {
        let mut run = PipelineRun::new(CharacterId::new());
        run.advance(PipelineStage::CalculatingAbilities).unwrap();
        run.fail("Unknown race: Tiefling").unwrap();
        assert_eq!(run.status(), RunStatus::Failed);
        let error = run.error.clone().unwrap();
        assert_eq!(error.stage, PipelineStage::CalculatingAbilities);
        assert!(error.message.contains("Tiefling"));
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut run = PipelineRun::new(CharacterId::new());
        run.cancel().unwrap();
        assert!(run.error.is_none());
        assert!(run.advance(PipelineStage::CalculatingAbilities).is_err());
        assert!(run.cancel().is_err());
        assert!(run.fail("late").is_err());
        assert_eq!(run.status(), RunStatus::Cancelled);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(PipelineStage::GeneratingFeatures.to_string(), "features");
        assert_eq!(
            PipelineStage::CalculatingBaseStats.label(),
            "Calculating combat stats..."
        );
    }
}
