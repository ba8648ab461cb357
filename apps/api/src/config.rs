use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// The vector-index settings are optional: with `VECTOR_DB_URL` unset the
/// service starts in degraded mode and serves every match from the
/// text-overlap fallback path.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub vector_db_url: Option<String>,
    pub vector_db_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            vector_db_url: std::env::var("VECTOR_DB_URL").ok(),
            vector_db_api_key: std::env::var("VECTOR_DB_API_KEY").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
