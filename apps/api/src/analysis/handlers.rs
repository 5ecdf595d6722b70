//! Axum route handler for idea submission.

use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::analysis::models::{AnalyzeResponse, IdeaSubmission, ValidationAnalysis};
use crate::analysis::store::{build_rows, persist_submission};
use crate::analysis::transform::{checked_verdict, fallback_analysis};
use crate::analysis::validation::validate_submission;
use crate::errors::AppError;
use crate::rate_limit::client_ip;
use crate::state::AppState;

/// POST /api/analyze (also mounted at POST /api/validate)
pub async fn handle_analyze(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<IdeaSubmission>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(submission) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let idea = validate_submission(&submission).map_err(AppError::InvalidInput)?;

    let user_ip = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));
    let now = Utc::now();
    let decision = state.rate_limiter.check_and_record(&user_ip, now).await;
    if !decision.allowed {
        info!(user_ip = %user_ip, "Submission rejected by rate limiter");
        return Err(AppError::RateLimited {
            retry_after_secs: decision.retry_after_secs(now),
        });
    }

    let (raw, fallback) = match state.analyzer.analyze(&idea).await {
        Ok(raw) => (raw, false),
        Err(e) if state.config.llm_fallback_enabled => {
            warn!(error = %e, app_name = %idea.app_name, "LLM analysis failed, serving fallback");
            (fallback_analysis(), true)
        }
        Err(e) => return Err(AppError::Llm(e.to_string())),
    };

    let verdict = checked_verdict(&raw).map_err(|e| AppError::Llm(e.to_string()))?;
    let analysis = ValidationAnalysis::from_brutal(&raw, verdict);
    let (idea_row, result_row) = build_rows(&idea, &user_ip, &analysis, &raw, now)
        .map_err(|e| AppError::Internal(e.into()))?;

    // Fallback critiques are not stored; they would skew the leaderboard and analytics.
    if !fallback {
        if let Err(e) = persist_submission(&state.db, &idea_row, &result_row).await {
            error!(error = %e, idea_id = %idea_row.id, "Failed to persist validation result");
        }
    }

    Ok(Json(AnalyzeResponse {
        result: result_row,
        app_idea: idea_row,
        brutal_analysis: raw,
        remaining_requests: decision.remaining,
        fallback,
    }))
}
