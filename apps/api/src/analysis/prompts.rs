// Prompt constants for idea analysis.
// JSON-only enforcement comes from llm_client::prompts.

use crate::analysis::models::NewIdea;

/// Persona half of the system prompt; joined with `JSON_ONLY_SYSTEM` at call time.
pub const ANALYSIS_PERSONA: &str = "You are a brutally honest startup advisor and technical expert \
    known for destroying bad ideas with facts. Be extremely harsh in analysis but genuinely \
    helpful in guidance.";

/// Analysis prompt template. Placeholders: `{app_name}`, `{description}`,
/// `{target_market}`, `{budget}`, `{features}`, `{competition}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"A developer pitched this app idea.

App name: {app_name}
Description: {description}
Target audience: {target_market}
Budget / monetization plan: {budget}
Key features: {features}
Known competition: {competition}

First destroy the idea with brutal honesty, then help them fix it:
- give 3-5 specific actionable steps to improve the idea
- suggest ways to differentiate from existing competition
- recommend 2-3 pivot approaches that could work better
- list validation steps to take before writing any code

Return a JSON object with this EXACT schema:
{
  "verdict": "BUILD" | "BAIL" | "CAUTION",
  "overall_score": <number 0-10>,
  "market_reality": { "score": <number 0-10>, "analysis": "<market demand, size, saturation>" },
  "competition_analysis": { "score": <number 0-10>, "analysis": "<existing competitors and why this is not unique enough>" },
  "technical_feasibility": { "score": <number 0-10>, "analysis": "<technical challenges and required expertise>" },
  "monetization_reality": { "score": <number 0-10>, "analysis": "<why the money-making plan will or won't work>" },
  "fatal_flaws": ["<major problem>", "..."],
  "time_saved_hours": <estimated hours saved by not building>,
  "brutal_summary": "<snarky one-liner>",
  "actionable_steps": ["<step>", "..."],
  "differentiation_strategy": "<advice>",
  "pivot_suggestions": ["<pivot>", "..."],
  "validation_steps": ["<step>", "..."]
}

Only give a BUILD verdict if the idea is genuinely promising. Use CAUTION when the idea
could work only after significant changes. Include specific data and examples."#;

const NOT_SPECIFIED: &str = "Not specified";

/// Renders the analysis prompt for a validated idea.
pub fn render_analysis_prompt(idea: &NewIdea) -> String {
    fill_placeholders(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("app_name", idea.app_name.as_str()),
            ("description", idea.description.as_str()),
            ("target_market", idea.target_market.as_str()),
            ("budget", or_unspecified(&idea.budget)),
            ("features", or_unspecified(&idea.features)),
            ("competition", or_unspecified(&idea.competition)),
        ],
    )
}

fn or_unspecified(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_SPECIFIED)
}

/// Substitutes `{key}` placeholders in a single pass over `template`.
/// Substituted values are never rescanned; unknown braces pass through.
fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = values.iter().find_map(|(key, value)| {
            tail.strip_prefix(key)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_every_placeholder() {
        let idea = NewIdea {
            app_name: "Pet Rock 2.0".into(),
            user_name: None,
            description: "Digital pet rocks with NFT ownership certificates.".into(),
            target_market: "NFT collectors".into(),
            budget: Some("NFT sales".into()),
            features: None,
            competition: None,
        };
        let prompt = render_analysis_prompt(&idea);

        assert!(prompt.contains("App name: Pet Rock 2.0"));
        assert!(prompt.contains("Budget / monetization plan: NFT sales"));
        assert!(prompt.contains("Key features: Not specified"));
        for placeholder in ["{app_name}", "{description}", "{target_market}", "{budget}"] {
            assert!(!prompt.contains(placeholder), "left {placeholder} in prompt");
        }
    }

    #[test]
    fn test_render_keeps_braces_in_user_text() {
        let idea = NewIdea {
            app_name: "Template Tool".into(),
            user_name: None,
            description: "Generates {competition} and {budget} sections for pitch decks.".into(),
            target_market: "Founders".into(),
            budget: Some("Freemium".into()),
            features: None,
            competition: Some("Pitch.com".into()),
        };
        let prompt = render_analysis_prompt(&idea);

        assert!(prompt.contains(
            "Description: Generates {competition} and {budget} sections for pitch decks."
        ));
        assert!(prompt.contains("Known competition: Pitch.com"));
        assert!(prompt.contains("Budget / monetization plan: Freemium"));
    }

    #[test]
    fn test_schema_braces_survive_rendering() {
        let rendered = fill_placeholders(ANALYSIS_PROMPT_TEMPLATE, &[]);
        assert_eq!(rendered, ANALYSIS_PROMPT_TEMPLATE);
        assert_eq!(fill_placeholders("{a}{b} {c", &[("a", "1"), ("b", "{a}")]), "1{a} {c");
    }
}
