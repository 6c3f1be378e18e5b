//! Configuration module for Movies Buddy.
//!
//! Handles settings, environment secrets, and the agent instructions.

mod env;
mod prompts;
mod settings;

pub use env::{
    load_dotenv, resolve_api_key, resolve_api_key_with, TvdbCredentials,
    API_KEY_ENV_VARS,
};
pub use prompts::{load_instructions, render, MAIN_INSTRUCTIONS};
pub use settings::{
    AgentSettings, GeneralSettings, McpSettings, ModelSettings, PromptSettings, Settings,
    TvdbSettings, WikipediaSettings,
};
