use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::idea::{AppIdeaRow, ValidationResultRow, ValidationResultWithIdea};
use crate::models::Verdict;

/// Most recent results listed by GET /api/results.
pub const RECENT_RESULTS_LIMIT: i64 = 100;

const JOINED_SELECT: &str = r#"
    SELECT r.id, r.app_idea_id, r.score, r.verdict, r.strengths, r.weaknesses,
           r.opportunities, r.detailed_analysis, r.action_items, r.time_saved_hours,
           r.raw_analysis, r.created_at,
           i.app_name      AS idea_app_name,
           i.user_name     AS idea_user_name,
           i.description   AS idea_description,
           i.target_market AS idea_target_market,
           i.budget        AS idea_budget,
           i.features      AS idea_features,
           i.competition   AS idea_competition,
           i.user_ip       AS idea_user_ip,
           i.created_at    AS idea_created_at
    FROM validation_results r
    JOIN app_ideas i ON i.id = r.app_idea_id
"#;

/// Flat row produced by `JOINED_SELECT`, split back into its two halves.
#[derive(Debug, FromRow)]
struct JoinedRow {
    id: Uuid,
    app_idea_id: Uuid,
    score: f64,
    verdict: String,
    strengths: Json<Vec<String>>,
    weaknesses: Json<Vec<String>>,
    opportunities: Json<Vec<String>>,
    detailed_analysis: String,
    action_items: Json<Vec<String>>,
    time_saved_hours: f64,
    raw_analysis: Value,
    created_at: DateTime<Utc>,
    idea_app_name: String,
    idea_user_name: Option<String>,
    idea_description: String,
    idea_target_market: String,
    idea_budget: Option<String>,
    idea_features: Option<String>,
    idea_competition: Option<String>,
    idea_user_ip: Option<String>,
    idea_created_at: DateTime<Utc>,
}

impl From<JoinedRow> for ValidationResultWithIdea {
    fn from(row: JoinedRow) -> Self {
        ValidationResultWithIdea {
            app_idea: AppIdeaRow {
                id: row.app_idea_id,
                app_name: row.idea_app_name,
                user_name: row.idea_user_name,
                description: row.idea_description,
                target_market: row.idea_target_market,
                budget: row.idea_budget,
                features: row.idea_features,
                competition: row.idea_competition,
                user_ip: row.idea_user_ip,
                created_at: row.idea_created_at,
            },
            result: ValidationResultRow {
                id: row.id,
                app_idea_id: row.app_idea_id,
                score: row.score,
                verdict: row.verdict,
                strengths: row.strengths,
                weaknesses: row.weaknesses,
                opportunities: row.opportunities,
                detailed_analysis: row.detailed_analysis,
                action_items: row.action_items,
                time_saved_hours: row.time_saved_hours,
                raw_analysis: row.raw_analysis,
                created_at: row.created_at,
            },
        }
    }
}

pub async fn get_result_with_idea(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ValidationResultWithIdea>, sqlx::Error> {
    let row: Option<JoinedRow> = sqlx::query_as(&format!("{JOINED_SELECT} WHERE r.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Into::into))
}

/// Newest first.
pub async fn list_recent_results(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<ValidationResultWithIdea>, sqlx::Error> {
    let rows: Vec<JoinedRow> = sqlx::query_as(&format!(
        "{JOINED_SELECT} ORDER BY r.created_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Newest first, restricted to one verdict.
pub async fn list_results_by_verdict(
    pool: &PgPool,
    verdict: Verdict,
    limit: i64,
) -> Result<Vec<ValidationResultWithIdea>, sqlx::Error> {
    let rows: Vec<JoinedRow> = sqlx::query_as(&format!(
        "{JOINED_SELECT} WHERE r.verdict = $1 ORDER BY r.created_at DESC LIMIT $2"
    ))
    .bind(verdict.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Raw aggregates over every stored result.
#[derive(Debug, Clone, Default, FromRow)]
pub struct VerdictTotals {
    pub total: i64,
    pub build: i64,
    pub bail: i64,
    pub caution: i64,
    pub time_saved: f64,
    pub average_score: f64,
}

pub async fn verdict_totals(pool: &PgPool) -> Result<VerdictTotals, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT COUNT(*)                                       AS total,
               COUNT(*) FILTER (WHERE verdict = 'BUILD')      AS build,
               COUNT(*) FILTER (WHERE verdict = 'BAIL')       AS bail,
               COUNT(*) FILTER (WHERE verdict = 'CAUTION')    AS caution,
               COALESCE(SUM(time_saved_hours), 0)::float8     AS time_saved,
               COALESCE(AVG(score), 0)::float8                AS average_score
        FROM validation_results
        "#,
    )
    .fetch_one(pool)
    .await
}
