//! Error types for Movies Buddy.

use thiserror::Error;

/// Library-level error type for Movies Buddy operations.
#[derive(Error, Debug)]
pub enum MoviesBuddyError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// No Gemini-compatible API key could be resolved.
    #[error("{0}")]
    MissingApiKey(String),

    #[error("{0}")]
    Wikipedia(String),

    #[error("No Wikipedia summary found for '{0}'.")]
    SummaryNotFound(String),

    #[error("{0}")]
    TvdbAuthentication(String),

    #[error("{0}")]
    TvdbRequest(String),

    #[error("MCP error: {0}")]
    Mcp(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Agent run timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("{0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for Movies Buddy operations.
pub type Result<T> = std::result::Result<T, MoviesBuddyError>;
