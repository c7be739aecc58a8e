use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Model provider. Default: `GeminiClient`; tests swap in a scripted stand-in.
    pub model: Arc<dyn ModelClient>,
    pub config: Config,
}
