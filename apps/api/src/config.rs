use anyhow::{anyhow, Context, Result};

use crate::layout::PaperSize;
use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub translation_model: String,
    /// Language assumed when detection has no signal.
    pub interface_language: String,
    pub page_size: PaperSize,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_api_url: env_or("OPENAI_API_URL", DEFAULT_API_URL),
            translation_model: env_or("TRANSLATION_MODEL", DEFAULT_MODEL),
            interface_language: env_or("INTERFACE_LANGUAGE", "fr").to_ascii_lowercase(),
            page_size: env_or("PAGE_SIZE", "a4")
                .parse::<PaperSize>()
                .map_err(|e| anyhow!(e))
                .context("PAGE_SIZE must be 'a4' or 'letter'")?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
