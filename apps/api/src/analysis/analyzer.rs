//! Idea analyzer: pluggable, trait-based backend that produces a `BrutalAnalysis`.
//!
//! `AppState` holds an `Arc<dyn IdeaAnalyzer>`. Production uses `ClaudeAnalyzer`;
//! tests swap in a canned implementation.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::analysis::models::{BrutalAnalysis, NewIdea};
use crate::analysis::prompts::{render_analysis_prompt, ANALYSIS_PERSONA};
use crate::analysis::transform::checked_verdict;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

#[async_trait]
pub trait IdeaAnalyzer: Send + Sync {
    /// Returns a payload that has already passed `checked_verdict`.
    async fn analyze(&self, idea: &NewIdea) -> Result<BrutalAnalysis, LlmError>;
}

/// Analyzer backed by the Anthropic Messages API.
pub struct ClaudeAnalyzer {
    llm: LlmClient,
    system: String,
}

impl ClaudeAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            system: format!("{ANALYSIS_PERSONA} {JSON_ONLY_SYSTEM}"),
        }
    }
}

#[async_trait]
impl IdeaAnalyzer for ClaudeAnalyzer {
    async fn analyze(&self, idea: &NewIdea) -> Result<BrutalAnalysis, LlmError> {
        let prompt = render_analysis_prompt(idea);
        debug!(app_name = %idea.app_name, prompt_len = prompt.len(), "Requesting analysis");

        let analysis: BrutalAnalysis = self.llm.call_json(&prompt, &self.system).await?;
        let verdict = checked_verdict(&analysis)?;

        info!(app_name = %idea.app_name, %verdict, "Analysis received");
        Ok(analysis)
    }
}
