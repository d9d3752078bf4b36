use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{PipelineRun, PipelineStage, RunStatus};

/// Progress of a run as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunProgressDto {
    pub run_id: String,
    pub character_id: String,
    pub stage: PipelineStage,
    /// Human-readable label for the current stage
    pub label: String,
    pub status: RunStatus,
    pub error: Option<RunErrorDto>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunErrorDto {
    pub stage: PipelineStage,
    pub message: String,
}

impl From<&PipelineRun> for RunProgressDto {
    fn from(run: &PipelineRun) -> Self {
        Self {
            run_id: run.id.to_string(),
            character_id: run.character_id.to_string(),
            stage: run.stage,
            label: run.stage.label().to_string(),
            status: run.status(),
            error: run.error.as_ref().map(|e| RunErrorDto {
                stage: e.stage,
                message: e.message.clone(),
            }),
            started_at: run.started_at,
            updated_at: run.updated_at,
        }
    }
}

impl From<PipelineRun> for RunProgressDto {
    fn from(run: PipelineRun) -> Self {
        Self::from(&run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::CharacterId;

    #[test]
    fn test_failed_run_progress() {
        let mut run = PipelineRun::new(CharacterId::new());
        run.advance(PipelineStage::CalculatingAbilities).unwrap();
        run.fail("Unknown race: Tiefling").unwrap();

        let dto = RunProgressDto::from(&run);
        assert_eq!(dto.status, RunStatus::Failed);
        assert_eq!(dto.label, "Failed");
        let error = dto.error.unwrap();
        assert_eq!(error.stage, PipelineStage::CalculatingAbilities);

        let json = serde_json::to_value(RunProgressDto::from(run)).unwrap();
        assert_eq!(json["stage"], "failed");
        assert_eq!(json["error"]["stage"], "calculating_abilities");
    }
}
