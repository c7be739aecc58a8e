/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the model provider directly.
/// Everything goes through the `ModelClient` trait so tests can swap in a stand-in.
///
/// One call per prompt: no retries, no client-side timeout.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Model used when `GEMINI_MODEL` is not set. Fixed for the life of the process.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Human-readable provider name used in per-file error messages.
pub const PROVIDER_NAME: &str = "Gemini";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// The one operation the parsing pipeline needs from a model provider.
///
/// Carried in `AppState` as `Arc<dyn ModelClient>`.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String, api_base: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    pub async fn call(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                self.model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.call(prompt).await?.text().ok_or(LlmError::EmptyContent)
    }
}

/// Builds an `Api` error, preferring the provider's own message when the body has one.
fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}
