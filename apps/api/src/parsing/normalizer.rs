//! Response Normalizer — pulls the JSON payload out of a free-form model reply.
//!
//! Model output is not guaranteed to be bare JSON. Detection order:
//! 1. a ```json fenced block
//! 2. any ``` fenced block
//! 3. the whole reply
//!
//! Whatever happens, the caller gets a `ParsedRecord` carrying the uploaded file name.

use serde_json::Value;
use tracing::warn;

use crate::llm_client::PROVIDER_NAME;
use crate::parsing::models::{ParsedRecord, FILE_NAME_KEY};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Returns the trimmed substring of `raw` most likely to hold the JSON payload.
///
/// An unclosed fence runs to the end of the reply. A fence with an empty body falls
/// back to the whole reply.
pub fn extract_json_candidate(raw: &str) -> &str {
    let fenced = if let Some((_, rest)) = raw.split_once(JSON_FENCE) {
        Some(up_to_fence(rest))
    } else if let Some((_, rest)) = raw.split_once(FENCE) {
        Some(up_to_fence(rest))
    } else {
        None
    };

    match fenced {
        Some(body) if !body.is_empty() => body.trim(),
        _ => raw.trim(),
    }
}

fn up_to_fence(rest: &str) -> &str {
    rest.split_once(FENCE).map(|(body, _)| body).unwrap_or(rest)
}

/// Parses a model reply into a record for `file_name`.
///
/// The model's own `fileName`, if any, is always replaced. On failure the raw reply is
/// kept verbatim under `rawGeminiResponse`.
pub fn normalize_response(raw: &str, file_name: &str) -> ParsedRecord {
    let candidate = extract_json_candidate(raw);

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(mut fields)) => {
            fields.insert(FILE_NAME_KEY.to_string(), Value::String(file_name.to_string()));
            ParsedRecord::Parsed(fields)
        }
        Ok(other) => {
            warn!(
                "Model response for {file_name} is JSON but not an object ({})",
                json_kind(&other)
            );
            ParsedRecord::failed_with_raw(
                file_name,
                format!(
                    "An unexpected error occurred during JSON parsing: expected a JSON object, got {}",
                    json_kind(&other)
                ),
                raw,
            )
        }
        Err(e) => {
            warn!("Failed to parse JSON for {file_name}: {e}");
            ParsedRecord::failed_with_raw(
                file_name,
                format!("Failed to parse {PROVIDER_NAME}'s response as JSON"),
                raw,
            )
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
