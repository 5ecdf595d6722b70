use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::{BrutalAnalysis, NewIdea, ValidationAnalysis};
use crate::models::idea::{AppIdeaRow, ValidationResultRow};

/// Builds the idea and result rows for one submission. Ids and timestamps are
/// assigned here so the response is identical whether or not persistence succeeds.
pub fn build_rows(
    idea: &NewIdea,
    user_ip: &str,
    analysis: &ValidationAnalysis,
    raw: &BrutalAnalysis,
    now: DateTime<Utc>,
) -> Result<(AppIdeaRow, ValidationResultRow), serde_json::Error> {
    let idea_row = AppIdeaRow {
        id: Uuid::new_v4(),
        app_name: idea.app_name.clone(),
        user_name: idea.user_name.clone(),
        description: idea.description.clone(),
        target_market: idea.target_market.clone(),
        budget: idea.budget.clone(),
        features: idea.features.clone(),
        competition: idea.competition.clone(),
        user_ip: Some(user_ip.to_string()),
        created_at: now,
    };

    let result_row = ValidationResultRow {
        id: Uuid::new_v4(),
        app_idea_id: idea_row.id,
        score: analysis.score,
        verdict: analysis.verdict.as_str().to_string(),
        strengths: Json(analysis.strengths.clone()),
        weaknesses: Json(analysis.weaknesses.clone()),
        opportunities: Json(analysis.opportunities.clone()),
        detailed_analysis: analysis.detailed_analysis.clone(),
        action_items: Json(analysis.action_items.clone()),
        time_saved_hours: analysis.time_saved_hours,
        raw_analysis: serde_json::to_value(raw)?,
        created_at: now,
    };

    Ok((idea_row, result_row))
}

/// Inserts an idea and its result in one transaction. Both rows land or neither does.
pub async fn persist_submission(
    pool: &PgPool,
    idea: &AppIdeaRow,
    result: &ValidationResultRow,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO app_ideas
            (id, app_name, user_name, description, target_market,
             budget, features, competition, user_ip, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(idea.id)
    .bind(&idea.app_name)
    .bind(&idea.user_name)
    .bind(&idea.description)
    .bind(&idea.target_market)
    .bind(&idea.budget)
    .bind(&idea.features)
    .bind(&idea.competition)
    .bind(&idea.user_ip)
    .bind(idea.created_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO validation_results
            (id, app_idea_id, score, verdict, strengths, weaknesses, opportunities,
             detailed_analysis, action_items, time_saved_hours, raw_analysis, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(result.id)
    .bind(result.app_idea_id)
    .bind(result.score)
    .bind(&result.verdict)
    .bind(&result.strengths)
    .bind(&result.weaknesses)
    .bind(&result.opportunities)
    .bind(&result.detailed_analysis)
    .bind(&result.action_items)
    .bind(result.time_saved_hours)
    .bind(&result.raw_analysis)
    .bind(result.created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        idea_id = %idea.id,
        result_id = %result.id,
        verdict = %result.verdict,
        "Persisted validation result"
    );
    Ok(())
}
