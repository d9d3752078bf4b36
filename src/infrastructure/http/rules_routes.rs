//! Rule table and pipeline status routes

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::dto::RuleTablesSummaryDto;
use crate::application::ports::inbound::PipelineStats;
use crate::infrastructure::state::AppState;

/// Version of the loaded tables and the ids a definition may use
pub async fn get_rules(State(state): State<Arc<AppState>>) -> Json<RuleTablesSummaryDto> {
    Json(RuleTablesSummaryDto::from(state.tables.as_ref()))
}

pub async fn get_pipeline_stats(State(state): State<Arc<AppState>>) -> Json<PipelineStats> {
    Json(state.sheets.stats())
}
