use crate::analysis::models::{IdeaSubmission, NewIdea};
use crate::errors::FieldError;

pub const APP_NAME_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 5000;
pub const TARGET_MARKET_MAX: usize = 500;
pub const OPTIONAL_FIELD_MAX: usize = 1000;

pub const TERMS_MESSAGE: &str = "You must agree to receive brutally honest feedback";

/// Validates a raw form submission.
///
/// Collects every violation instead of stopping at the first, so the form can
/// highlight all offending fields in one round trip. Lengths are counted in
/// characters after trimming.
pub fn validate_submission(input: &IdeaSubmission) -> Result<NewIdea, Vec<FieldError>> {
    let mut errors = Vec::new();

    let app_name = required(
        &mut errors,
        "appName",
        "App name",
        input.app_name.as_deref(),
        1,
        APP_NAME_MAX,
    );
    let description = required(
        &mut errors,
        "description",
        "Description",
        input.description.as_deref(),
        DESCRIPTION_MIN,
        DESCRIPTION_MAX,
    );
    let target_market = required(
        &mut errors,
        "targetMarket",
        "Target market",
        input.target_market.as_deref(),
        1,
        TARGET_MARKET_MAX,
    );

    let user_name = optional(&mut errors, "userName", "User name", input.user_name.as_deref());
    let budget = optional(&mut errors, "budget", "Budget", input.budget.as_deref());
    let features = optional(&mut errors, "features", "Features", input.features.as_deref());
    let competition = optional(
        &mut errors,
        "competition",
        "Competition",
        input.competition.as_deref(),
    );

    if input.agree_to_terms != Some(true) {
        errors.push(FieldError::new("agreeToTerms", TERMS_MESSAGE));
    }

    match (app_name, description, target_market) {
        (Some(app_name), Some(description), Some(target_market)) if errors.is_empty() => {
            Ok(NewIdea {
                app_name,
                user_name,
                description,
                target_market,
                budget,
                features,
                competition,
            })
        }
        _ => Err(errors),
    }
}

fn required(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Option<String> {
    let value = value.map(str::trim).unwrap_or_default();
    let len = value.chars().count();

    if len == 0 {
        errors.push(FieldError::new(field, format!("{label} is required")));
        return None;
    }
    if len < min {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at least {min} characters"),
        ));
        return None;
    }
    if len > max {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at most {max} characters"),
        ));
        return None;
    }
    Some(value.to_string())
}

fn optional(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: Option<&str>,
) -> Option<String> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    if value.chars().count() > OPTIONAL_FIELD_MAX {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at most {OPTIONAL_FIELD_MAX} characters"),
        ));
        return None;
    }
    Some(value.to_string())
}
