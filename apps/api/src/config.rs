use anyhow::{Context, Result};

const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
