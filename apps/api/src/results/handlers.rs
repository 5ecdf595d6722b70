//! Axum route handlers for the read side.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::idea::ValidationResultWithIdea;
use crate::models::Verdict;
use crate::results::analytics::AnalyticsReport;
use crate::results::store::{
    get_result_with_idea, list_recent_results, list_results_by_verdict, verdict_totals,
    RECENT_RESULTS_LIMIT,
};
use crate::results::wall_of_shame::{rank_entries, ShameEntry, WallOfShameQuery};
use crate::state::AppState;

/// GET /api/results
pub async fn handle_list_results(
    State(state): State<AppState>,
) -> Result<Json<Vec<ValidationResultWithIdea>>, AppError> {
    let results = list_recent_results(&state.db, RECENT_RESULTS_LIMIT).await?;
    Ok(Json(results))
}

/// GET /api/results/:id
pub async fn handle_get_result(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ValidationResultWithIdea>, AppError> {
    let Path(id) = id.map_err(|e| AppError::Validation(e.body_text()))?;
    get_result_with_idea(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Validation result not found".to_string()))
}

/// GET /api/wall-of-shame?limit=N
pub async fn handle_wall_of_shame(
    State(state): State<AppState>,
    query: Result<Query<WallOfShameQuery>, QueryRejection>,
) -> Result<Json<Vec<ShameEntry>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let results =
        list_results_by_verdict(&state.db, Verdict::Bail, query.effective_limit()).await?;
    Ok(Json(rank_entries(results)))
}

/// GET /api/admin/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let totals = verdict_totals(&state.db).await?;
    Ok(Json(totals.into()))
}
