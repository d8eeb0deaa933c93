use anyhow::{Context, Result};

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub backend_api_token: Option<String>,
    pub backend_timeout_secs: u64,
    pub port: u16,
    pub workspace_idle_minutes: i64,
    pub max_workspaces: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests do not have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            backend_url,
            backend_api_token: lookup("BACKEND_API_TOKEN").filter(|v| !v.trim().is_empty()),
            backend_timeout_secs: parse_or(&lookup, "BACKEND_TIMEOUT_SECS", 30)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            workspace_idle_minutes: parse_or(&lookup, "WORKSPACE_IDLE_MINUTES", 60)?,
            max_workspaces: parse_or(&lookup, "MAX_WORKSPACES", 1000)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
