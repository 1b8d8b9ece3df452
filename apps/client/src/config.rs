use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Backend used when `SHORTLISTER_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://short-back-5vsc.onrender.com/api";

/// Client configuration loaded from environment variables.
/// Every variable is optional; unset values fall back to fixed defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub http_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_url = std::env::var("SHORTLISTER_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_file = match std::env::var("SHORTLISTER_SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_file()?,
        };

        let http_timeout = std::env::var("SHORTLISTER_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .context("SHORTLISTER_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            api_url: normalize_base_url(&api_url),
            session_file,
            http_timeout,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Configuration pointing at an explicit backend, used by tests and embedders.
    pub fn for_api(api_url: &str, session_file: PathBuf) -> Self {
        Config {
            api_url: normalize_base_url(api_url),
            session_file,
            http_timeout: Duration::from_secs(30),
            rust_log: "info".to_string(),
        }
    }
}

fn default_session_file() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory for the session file")?;
    Ok(home.join(".shortlister").join("session.json"))
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
