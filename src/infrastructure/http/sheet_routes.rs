//! Character sheet API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::application::dto::RunProgressDto;
use crate::application::ports::inbound::{PipelineError, SheetLookup};
use crate::domain::entities::CharacterSheet;
use crate::domain::value_objects::CharacterId;
use crate::infrastructure::state::AppState;

pub(crate) fn parse_character_id(id: &str) -> Result<CharacterId, (StatusCode, String)> {
    id.parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid character ID".to_string()))
}

/// Map use case errors onto HTTP statuses
fn pipeline_error_response(error: PipelineError) -> (StatusCode, String) {
    let status = match &error {
        PipelineError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
        PipelineError::Cancelled => StatusCode::CONFLICT,
        PipelineError::StageComputation { .. }
        | PipelineError::StagePanicked { .. }
        | PipelineError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}

/// Regenerate the sheet, cancelling any run in flight
pub async fn regenerate_sheet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CharacterSheet>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;
    let sheet = state
        .sheets
        .generate_character_sheet(id)
        .await
        .map_err(pipeline_error_response)?;
    Ok(Json(sheet.as_ref().clone()))
}

/// Return the cached sheet, generating it on a miss
pub async fn get_or_generate_sheet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CharacterSheet>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;
    let sheet = state
        .sheets
        .get_character_sheet(id)
        .await
        .map_err(pipeline_error_response)?;
    Ok(Json(sheet.as_ref().clone()))
}

/// Non-blocking read: 200 with the sheet, 202 with progress while a run is
/// in flight, 404 otherwise
pub async fn get_sheet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let id = parse_character_id(&id)?;
    let lookup = state
        .sheets
        .peek_character_sheet(id)
        .await
        .map_err(pipeline_error_response)?;

    Ok(match lookup {
        SheetLookup::Ready(sheet) => Json(sheet.as_ref().clone()).into_response(),
        SheetLookup::Pending(run) => {
            (StatusCode::ACCEPTED, Json(RunProgressDto::from(run))).into_response()
        }
        SheetLookup::NotFound => (
            StatusCode::NOT_FOUND,
            format!("No sheet for character {}", id),
        )
            .into_response(),
    })
}

/// Latest run for the character
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RunProgressDto>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;
    state
        .sheets
        .progress(id)
        .await
        .map(|run| Json(RunProgressDto::from(run)))
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("No sheet run for character {}", id),
            )
        })
}
