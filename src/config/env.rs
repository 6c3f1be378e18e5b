//! Environment loading and secret resolution.

use crate::error::{MoviesBuddyError, Result};
use tracing::{debug, warn};

/// API key variables in priority order. `GEMENI_API_KEY` is a legacy misspelling.
pub const API_KEY_ENV_VARS: [&str; 3] = ["GEMINI_API_KEY", "GOOGLE_API_KEY", "GEMENI_API_KEY"];

/// Load a `.env` file from the working directory without overriding
/// variables that are already set.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env: {}", e),
    }
}

/// Resolve the model API key from the process environment.
pub fn resolve_api_key() -> Result<String> {
    resolve_api_key_with(|key| std::env::var(key).ok())
}

/// Resolve the model API key using `lookup`, returning the first non-empty value.
pub fn resolve_api_key_with<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    for key in API_KEY_ENV_VARS {
        let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        if key == "GEMENI_API_KEY" {
            warn!(
                "Environment variable 'GEMENI_API_KEY' is a misspelling. \
                 Please migrate to 'GEMINI_API_KEY'."
            );
        }
        debug!("Using API key from {}", key);
        return Ok(value.trim().to_string());
    }

    Err(MoviesBuddyError::MissingApiKey(
        "Set GEMINI_API_KEY or GOOGLE_API_KEY before running.".to_string(),
    ))
}

/// TVDB API credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct TvdbCredentials {
    pub api_key: String,
    pub pin: String,
}

impl TvdbCredentials {
    /// Load credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load `TVDB_API_KEY` and `TVDB_PIN` using `lookup`. Both are required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("TVDB_API_KEY").unwrap_or_default().trim().to_string();
        let pin = lookup("TVDB_PIN").unwrap_or_default().trim().to_string();

        if api_key.is_empty() || pin.is_empty() {
            return Err(MoviesBuddyError::Config(
                "TVDB_API_KEY and TVDB_PIN environment variables are required.".to_string(),
            ));
        }

        Ok(Self { api_key, pin })
    }
}
