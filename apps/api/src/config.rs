use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if the generation-service credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Where fastembed keeps downloaded model files. `None` uses fastembed's default.
    pub embedding_cache_dir: Option<PathBuf>,
    /// Upper bound for a single match request (uploads + pasted text).
    pub max_request_bytes: usize,
}

const DEFAULT_MAX_REQUEST_BYTES: usize = 20 * 1024 * 1024;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            embedding_cache_dir: std::env::var("FASTEMBED_CACHE_DIR").ok().map(PathBuf::from),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
