//! Configuration settings for Movies Buddy.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub agent: AgentSettings,
    pub wikipedia: WikipediaSettings,
    pub tvdb: TvdbSettings,
    pub mcp: McpSettings,
    pub prompts: PromptSettings,

    /// File these settings were resolved from, passed on to child processes.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Hosted model settings (any OpenAI-compatible chat completions gateway).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Base URL of the chat completions API. Overridden by `GEMINI_BASE_URL`.
    pub base_url: String,
    /// Model identifier. Overridden by `GEMINI_MODEL`.
    pub name: String,
    /// HTTP timeout for a single model request.
    pub request_timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai/".to_string(),
            name: "gemini-2.5-pro".to_string(),
            request_timeout_secs: 300,
        }
    }
}

/// Agent loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Display name of the agent.
    pub name: String,
    /// Upper bound for a whole agent run (all model and tool calls).
    pub run_timeout_secs: u64,
    /// Maximum number of model calls per user turn.
    pub max_iterations: usize,
    /// Chat history kept between turns (user and assistant messages).
    pub max_history_messages: usize,
    /// Attach the TVDB MCP server's tools to the agent.
    pub enable_tvdb_mcp: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: "Movies Buddy".to_string(),
            run_timeout_secs: 30,
            max_iterations: 10,
            max_history_messages: 30,
            enable_tvdb_mcp: true,
        }
    }
}

impl AgentSettings {
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}

/// Wikipedia lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaSettings {
    /// Wikipedia language edition.
    pub language: String,
    /// REST API base URL. Derived from `language` when unset.
    pub base_url: Option<String>,
    /// User-Agent sent with every request, as Wikimedia requires.
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for WikipediaSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            base_url: None,
            user_agent: "MoviesBuddyAgent/1.0 (https://example.com/contact)".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl WikipediaSettings {
    /// REST API root for the configured language edition.
    pub fn api_base(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.wikipedia.org/api/rest_v1", self.language),
        }
    }
}

/// TVDB API settings. Credentials come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TvdbSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for TvdbSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api4.thetvdb.com/v4".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// How the agent launches the TVDB MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct McpSettings {
    /// Server executable. Defaults to the running `movies-buddy` binary.
    pub command: Option<String>,
    pub args: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            command: None,
            args: vec!["mcp".to_string()],
            request_timeout_secs: 60,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// File whose contents replace the built-in agent instructions.
    pub instructions_file: Option<String>,
    /// Custom variables available in the instructions as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied after the file is read.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.source = Some(config_path);
        Ok(settings)
    }

    /// Apply `GEMINI_BASE_URL` and `GEMINI_MODEL` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("GEMINI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.model.base_url = url.trim().to_string();
        }
        if let Some(model) = lookup("GEMINI_MODEL").filter(|v| !v.trim().is_empty()) {
            self.model.name = model.trim().to_string();
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::MoviesBuddyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("movies-buddy")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}
