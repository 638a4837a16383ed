//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MEDISHOP_API_URL` - Backend base URL (default: `http://localhost:8080/`)
//! - `MEDISHOP_SESSION_FILE` - Session storage file
//!   (default: `<platform data dir>/medishop/session.json`)
//! - `MEDISHOP_REQUEST_TIMEOUT_SECS` - Per-request timeout in seconds
//!   (default: none, requests wait indefinitely)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080/";
const SESSION_DIR_NAME: &str = "medishop";
const SESSION_FILE_NAME: &str = "session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, always ending in `/`
    pub api_url: Url,
    /// File backing the durable session storage
    pub session_file: PathBuf,
    /// Optional per-request timeout
    pub request_timeout: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// session file is configured and the platform has no data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("MEDISHOP_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("MEDISHOP_API_URL".to_string(), e))?;

        let session_file = match get_optional_env("MEDISHOP_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        let request_timeout = get_optional_env("MEDISHOP_REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_timeout(&raw))
            .transpose()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MEDISHOP_REQUEST_TIMEOUT_SECS".to_string(), e)
            })?;

        Ok(Self {
            api_url,
            session_file,
            request_timeout,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at a given backend and session file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is not a valid HTTP(S) base URL.
    pub fn new(api_url: &str, session_file: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("api_url".to_string(), e))?;
        Ok(Self {
            api_url,
            session_file: session_file.into(),
            request_timeout: None,
            sentry_dsn: None,
            sentry_environment: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse the backend base URL and make sure relative joins land under it.
fn parse_api_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot be used as a base".to_string());
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse a timeout in whole seconds; zero is rejected.
fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs = raw.trim().parse::<u64>().map_err(|e| e.to_string())?;
    if secs == 0 {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(secs))
}

/// Default session file under the platform data directory.
fn default_session_file() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(SESSION_DIR_NAME).join(SESSION_FILE_NAME))
        .ok_or_else(|| ConfigError::MissingEnvVar("MEDISHOP_SESSION_FILE".to_string()))
}
