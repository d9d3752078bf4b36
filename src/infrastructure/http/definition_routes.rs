//! Character definition API routes
//!
//! The character editor owns definitions; these routes let it hand them to
//! the engine.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::domain::entities::CharacterDefinition;
use super::parse_character_id;
use crate::infrastructure::state::AppState;

/// Store a definition. The id in the path must match the body.
pub async fn put_definition(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(definition): Json<CharacterDefinition>,
) -> Result<Json<CharacterDefinition>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;
    if definition.id != id {
        return Err((
            StatusCode::BAD_REQUEST,
            "Character ID in path does not match body".to_string(),
        ));
    }

    state
        .definitions
        .save(&definition)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    tracing::info!("Saved definition for character {}", id);

    Ok(Json(definition))
}

pub async fn get_definition(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CharacterDefinition>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;
    state
        .definitions
        .get(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("Character definition not found: {}", id),
            )
        })
}
