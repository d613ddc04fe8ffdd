//! Model backend implementations.

pub mod gemini;

pub use gemini::GeminiModel;

use crate::error::{ExtractionError, Result};
use crate::prompts::PromptSet;
use crate::types::JobRecord;

/// Model names the pipeline will talk to.
///
/// Anything else fails with `UnsupportedModel` before any network call.
pub const SUPPORTED_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-1.5-flash",
];

/// Build a model backend from an allow-listed model name.
pub fn from_name(name: &str, prompts: PromptSet) -> Result<GeminiModel> {
    if !SUPPORTED_MODELS.contains(&name) {
        return Err(ExtractionError::UnsupportedModel {
            name: name.to_string(),
        });
    }
    Ok(GeminiModel::from_env(prompts)?.with_model(name))
}

/// Parse a model completion into structured records.
///
/// Accepts either a JSON array of records or a single record object (a
/// one-document batch may come back unwrapped). Markdown code fences are
/// stripped first; models add them despite instructions.
pub fn parse_records(completion: &str) -> Result<Vec<JobRecord>> {
    let body = strip_code_fences(completion);

    if let Ok(records) = serde_json::from_str::<Vec<JobRecord>>(body) {
        return Ok(records);
    }
    if let Ok(record) = serde_json::from_str::<JobRecord>(body) {
        return Ok(vec![record]);
    }

    Err(ExtractionError::MalformedResponse {
        reason: format!(
            "expected a JSON array of records, got: {}",
            truncate(body, 120)
        ),
    })
}

/// Strip a surrounding ``` or ```json fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
