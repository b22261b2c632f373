use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::errors::AppError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub token_path: PathBuf,
}

impl ConsoleConfig {
    pub fn new(base_url: &str, token_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_path: token_path.into(),
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        let base_url = std::env::var("CONSOLE_API_URL")
            .map_err(|_| AppError::configuration("CONSOLE_API_URL not set"))?;
        let timeout_secs = std::env::var("CONSOLE_TIMEOUT_SECS")
            .map(|val| val.parse::<u64>())
            .unwrap_or(Ok(DEFAULT_TIMEOUT_SECS))
            .map_err(|_| AppError::configuration("CONSOLE_TIMEOUT_SECS must be a valid integer"))?;
        let token_path = std::env::var("CONSOLE_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_token_path());

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            timeout: Duration::from_secs(timeout_secs),
            token_path,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    // Url::join drops the last path segment unless the base ends with '/'.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|err| AppError::configuration(format!("invalid CONSOLE_API_URL {raw}: {err}")))
}

fn default_token_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(".role-console").join("token"),
        _ => PathBuf::from(".role-console-token"),
    }
}
