use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::idea::ValidationResultWithIdea;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;
pub const TOP_WEAKNESSES: usize = 3;

#[derive(Debug, Default, Deserialize)]
pub struct WallOfShameQuery {
    pub limit: Option<i64>,
}

impl WallOfShameQuery {
    /// Requested limit clamped to `1..=MAX_LIMIT`; `DEFAULT_LIMIT` when absent.
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShameEntry {
    pub id: Uuid,
    pub rank: usize,
    pub app_name: String,
    pub description: String,
    pub target_market: String,
    pub score: f64,
    pub verdict: String,
    pub top_weaknesses: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub time_saved: f64,
}

/// Ranks BAIL results in the order given (newest first), starting at 1.
pub fn rank_entries(results: Vec<ValidationResultWithIdea>) -> Vec<ShameEntry> {
    results
        .into_iter()
        .enumerate()
        .map(|(i, r)| ShameEntry {
            id: r.result.id,
            rank: i + 1,
            app_name: r.app_idea.app_name,
            description: r.app_idea.description,
            target_market: r.app_idea.target_market,
            score: r.result.score,
            verdict: r.result.verdict,
            top_weaknesses: r.result.weaknesses.0.into_iter().take(TOP_WEAKNESSES).collect(),
            created_at: r.result.created_at,
            time_saved: r.result.time_saved_hours,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::idea::{AppIdeaRow, ValidationResultRow};
    use sqlx::types::Json;

    fn bail(app_name: &str, weaknesses: &[&str]) -> ValidationResultWithIdea {
        let idea_id = Uuid::new_v4();
        let now = Utc::now();
        ValidationResultWithIdea {
            result: ValidationResultRow {
                id: Uuid::new_v4(),
                app_idea_id: idea_id,
                score: 2.0,
                verdict: "BAIL".into(),
                strengths: Json(vec![]),
                weaknesses: Json(weaknesses.iter().map(|w| w.to_string()).collect()),
                opportunities: Json(vec![]),
                detailed_analysis: "Market Reality (1/10): none".into(),
                action_items: Json(vec![]),
                time_saved_hours: 90.0,
                raw_analysis: serde_json::json!({}),
                created_at: now,
            },
            app_idea: AppIdeaRow {
                id: idea_id,
                app_name: app_name.into(),
                user_name: None,
                description: "Digital pet rocks with NFT certificates.".into(),
                target_market: "NFT collectors".into(),
                budget: None,
                features: None,
                competition: None,
                user_ip: None,
                created_at: now,
            },
        }
    }

    #[test]
    fn test_effective_limit_defaults_and_clamps() {
        assert_eq!(WallOfShameQuery::default().effective_limit(), DEFAULT_LIMIT);
        assert_eq!(WallOfShameQuery { limit: Some(30) }.effective_limit(), 30);
        assert_eq!(WallOfShameQuery { limit: Some(0) }.effective_limit(), 1);
        assert_eq!(WallOfShameQuery { limit: Some(-4) }.effective_limit(), 1);
        assert_eq!(WallOfShameQuery { limit: Some(10_000) }.effective_limit(), MAX_LIMIT);
    }

    #[test]
    fn test_ranks_start_at_one_in_input_order() {
        let entries = rank_entries(vec![bail("Pet Rock 2.0", &[]), bail("CryptoSocks", &[])]);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].app_name, "Pet Rock 2.0");
        assert_eq!(entries[1].rank, 2);
    }

    #[test]
    fn test_top_weaknesses_truncated() {
        let entries = rank_entries(vec![bail("CryptoSocks", &["a", "b", "c", "d"])]);
        assert_eq!(entries[0].top_weaknesses, vec!["a", "b", "c"]);
        assert_eq!(entries[0].time_saved, 90.0);
    }
}
