use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

const DEFAULT_PORT: u16 = 8000;
/// Resolved against the crate directory so the default works from any working directory.
const DEFAULT_INDEX_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static/index.html");
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Application configuration loaded once from environment variables at startup.
///
/// `GEMINI_API_KEY` is the only credential and it is optional here: the server still
/// starts without it and every model call fails with a per-file error instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub port: u16,
    pub rust_log: String,
    pub index_file: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            port: parse_env("PORT", DEFAULT_PORT)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            index_file: optional_env("INDEX_FILE")
                .unwrap_or_else(|| DEFAULT_INDEX_FILE.to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

/// Reads a variable, treating an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}


#[cfg(test)]
impl Config {
    /// Configuration for router tests: no credential, tiny defaults.
    pub fn for_tests() -> Self {
        Config {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            port: DEFAULT_PORT,
            rust_log: "debug".to_string(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
