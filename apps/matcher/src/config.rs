use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Engine configuration loaded from environment variables (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote NLP/embedding service; offline heuristics when unset.
    pub nlp_service_url: Option<String>,
    pub nlp_language: String,
    pub collaborator_timeout: Duration,
    /// JSON file replacing the built-in vocabulary tables.
    pub vocabulary_path: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_ms = std::env::var("COLLABORATOR_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse::<u64>()
            .context("COLLABORATOR_TIMEOUT_MS must be a whole number of milliseconds")?;

        Ok(Config {
            nlp_service_url: optional_env("NLP_SERVICE_URL"),
            nlp_language: std::env::var("NLP_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            collaborator_timeout: Duration::from_millis(timeout_ms),
            vocabulary_path: optional_env("VOCABULARY_PATH").map(PathBuf::from),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
