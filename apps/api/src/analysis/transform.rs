//! Turns the LLM's `BrutalAnalysis` into the flat `ValidationAnalysis` that is
//! stored and rendered, and supplies the canned fallback critique.

use crate::analysis::models::{BrutalAnalysis, SectionScore, ValidationAnalysis};
use crate::llm_client::LlmError;
use crate::models::Verdict;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

/// Clamps a score into `[SCORE_MIN, SCORE_MAX]`. Non-finite input maps to the floor.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(SCORE_MIN, SCORE_MAX)
    } else {
        SCORE_MIN
    }
}

/// Structure check applied to every LLM payload before it is trusted.
pub fn checked_verdict(analysis: &BrutalAnalysis) -> Result<Verdict, LlmError> {
    let raw = analysis
        .verdict
        .as_deref()
        .ok_or_else(|| LlmError::InvalidStructure("missing verdict".to_string()))?;
    let verdict = raw
        .parse::<Verdict>()
        .map_err(|e| LlmError::InvalidStructure(e.to_string()))?;
    if analysis.overall_score.is_none() {
        return Err(LlmError::InvalidStructure(
            "missing overall_score".to_string(),
        ));
    }
    Ok(verdict)
}

/// Text up to and excluding the first '.', trimmed. Empty input yields `None`.
fn first_sentence(text: &str) -> Option<String> {
    let sentence = text.split('.').next().unwrap_or_default().trim();
    (!sentence.is_empty()).then(|| sentence.to_string())
}

fn section_block(title: &str, section: &SectionScore) -> String {
    format!(
        "{title} ({}/10): {}",
        clamp_score(section.score),
        section.analysis.trim()
    )
}

impl ValidationAnalysis {
    /// Flattens a checked analysis. Strengths and opportunities are only
    /// drawn for BUILD verdicts.
    pub fn from_brutal(analysis: &BrutalAnalysis, verdict: Verdict) -> Self {
        let highlights = |a: &SectionScore, b: &SectionScore| -> Vec<String> {
            if verdict != Verdict::Build {
                return Vec::new();
            }
            [a, b]
                .iter()
                .filter_map(|s| first_sentence(&s.analysis))
                .collect()
        };

        let detailed_analysis = [
            section_block("Market Reality", &analysis.market_reality),
            section_block("Competition", &analysis.competition_analysis),
            section_block("Technical Feasibility", &analysis.technical_feasibility),
            section_block("Monetization", &analysis.monetization_reality),
        ]
        .join("\n\n");

        let action_items = if analysis.actionable_steps.is_empty() {
            analysis
                .fatal_flaws
                .iter()
                .enumerate()
                .map(|(i, flaw)| format!("Address fatal flaw {}: {flaw}", i + 1))
                .collect()
        } else {
            analysis.actionable_steps.clone()
        };

        ValidationAnalysis {
            score: clamp_score(analysis.overall_score.unwrap_or(SCORE_MIN)),
            verdict,
            strengths: highlights(&analysis.market_reality, &analysis.technical_feasibility),
            weaknesses: analysis.fatal_flaws.clone(),
            opportunities: highlights(
                &analysis.monetization_reality,
                &analysis.competition_analysis,
            ),
            detailed_analysis,
            action_items,
            time_saved_hours: if analysis.time_saved_hours.is_finite() {
                analysis.time_saved_hours.max(0.0)
            } else {
                0.0
            },
        }
    }
}

/// Canned CAUTION critique served when the LLM is unavailable and fallback is enabled.
pub fn fallback_analysis() -> BrutalAnalysis {
    let section = |analysis: &str| SectionScore {
        score: 5.0,
        analysis: analysis.to_string(),
    };

    BrutalAnalysis {
        verdict: Some(Verdict::Caution.as_str().to_string()),
        overall_score: Some(5.0),
        market_reality: section(
            "Our advisor is unavailable right now. Assume the market is smaller than you think.",
        ),
        competition_analysis: section(
            "Someone has probably built this already. Search before you code.",
        ),
        technical_feasibility: section(
            "Most ideas are buildable. Whether they are worth building is the real question.",
        ),
        monetization_reality: section(
            "Talk to ten potential customers and ask them to pay before you write a line of code.",
        ),
        fatal_flaws: vec!["Unvalidated demand".to_string()],
        time_saved_hours: 0.0,
        brutal_summary: Some("The AI is taking a break. Your idea is not off the hook.".to_string()),
        actionable_steps: vec![
            "Write a one-page pitch and show it to five people in your target market".to_string(),
            "Build a landing page and measure sign-ups before building the product".to_string(),
            "Try the analysis again later for the full brutal treatment".to_string(),
        ],
        differentiation_strategy: None,
        pivot_suggestions: Vec::new(),
        validation_steps: Vec::new(),
    }
}
