// Idea submission pipeline: validate, rate-limit, analyze via the LLM,
// transform the critique and persist idea + result together.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod store;
pub mod transform;
pub mod validation;
