use anyhow::{Context, Result};

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SERP_API_BASE_URL: &str = "https://serpapi.com";

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub serp_api_key: String,
    pub serp_api_base_url: String,
    pub anthropic_api_key: String,
    /// Sender address; also the SMTP login.
    pub email_address: String,
    pub email_password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            serp_api_key: require_env("SERP_API_KEY")?,
            serp_api_base_url: optional_env("SERP_API_BASE_URL", DEFAULT_SERP_API_BASE_URL),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            email_address: require_env("EMAIL_ADDRESS")?,
            email_password: require_env("EMAIL_PASSWORD")?,
            smtp_host: optional_env("SMTP_HOST", DEFAULT_SMTP_HOST),
            smtp_port: optional_env("SMTP_PORT", "587")
                .parse::<u16>()
                .context("SMTP_PORT must be a valid port number")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
