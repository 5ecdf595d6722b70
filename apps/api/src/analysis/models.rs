use serde::{Deserialize, Serialize};
use crate::models::idea::{AppIdeaRow, ValidationResultRow};
use crate::models::Verdict;

/// Raw form payload. Every field is optional at the wire level so that
/// validation can report all missing fields at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaSubmission {
    pub app_name: Option<String>,
    pub user_name: Option<String>,
    pub description: Option<String>,
    pub target_market: Option<String>,
    pub budget: Option<String>,
    pub features: Option<String>,
    pub competition: Option<String>,
    pub agree_to_terms: Option<bool>,
}

/// A submission that passed validation. Strings are trimmed and empty
/// optionals are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdea {
    pub app_name: String,
    pub user_name: Option<String>,
    pub description: String,
    pub target_market: String,
    pub budget: Option<String>,
    pub features: Option<String>,
    pub competition: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionScore {
    pub score: f64,
    pub analysis: String,
}

/// The structured critique requested from the LLM.
///
/// `verdict` and `overall_score` stay loosely typed here so that a malformed
/// payload fails the structure check with a useful message instead of a
/// bare serde error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrutalAnalysis {
    #[serde(default)]
    pub verdict: Option<String>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    pub market_reality: SectionScore,
    pub competition_analysis: SectionScore,
    pub technical_feasibility: SectionScore,
    pub monetization_reality: SectionScore,
    #[serde(default)]
    pub fatal_flaws: Vec<String>,
    #[serde(default)]
    pub time_saved_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brutal_summary: Option<String>,
    #[serde(default)]
    pub actionable_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differentiation_strategy: Option<String>,
    #[serde(default)]
    pub pivot_suggestions: Vec<String>,
    #[serde(default)]
    pub validation_steps: Vec<String>,
}

/// The flattened, storable form of a `BrutalAnalysis`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationAnalysis {
    pub score: f64,
    pub verdict: Verdict,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub detailed_analysis: String,
    pub action_items: Vec<String>,
    pub time_saved_hours: f64,
}

/// Response body for POST /api/analyze.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: ValidationResultRow,
    pub app_idea: AppIdeaRow,
    pub brutal_analysis: BrutalAnalysis,
    pub remaining_requests: i32,
    /// True when the LLM failed and the canned analysis was served instead.
    pub fallback: bool,
}
