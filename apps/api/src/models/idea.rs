use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A submitted idea. Written once alongside its result; never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppIdeaRow {
    pub id: Uuid,
    pub app_name: String,
    pub user_name: Option<String>,
    pub description: String,
    pub target_market: String,
    pub budget: Option<String>,
    pub features: Option<String>,
    pub competition: Option<String>,
    #[serde(skip_serializing)]
    pub user_ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The critique for exactly one idea. `verdict` holds one of BUILD, BAIL, CAUTION.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResultRow {
    pub id: Uuid,
    pub app_idea_id: Uuid,
    pub score: f64,
    pub verdict: String,
    pub strengths: Json<Vec<String>>,
    pub weaknesses: Json<Vec<String>>,
    pub opportunities: Json<Vec<String>>,
    pub detailed_analysis: String,
    pub action_items: Json<Vec<String>>,
    pub time_saved_hours: f64,
    #[serde(skip_serializing)]
    pub raw_analysis: Value,
    pub created_at: DateTime<Utc>,
}

/// A result joined with its idea, as returned by the read endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResultWithIdea {
    #[serde(flatten)]
    pub result: ValidationResultRow,
    pub app_idea: AppIdeaRow,
}
