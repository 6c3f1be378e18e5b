//! Movies Buddy - a TV series and movie assistant agent
//!
//! Answers free-form questions about TV series and movies with a hosted
//! chat model that can call two tools:
//!
//! - `get_series_movies_summary` - a Wikipedia page summary for a title
//! - `search_tv_series_tvdb` - a search against The TV Database (TVDB),
//!   served by a local MCP server over stdio
//!
//! # Architecture
//!
//! - `config` - Settings, environment and prompt templates
//! - `openai` - Chat completions client for the OpenAI-compatible endpoint
//! - `wikipedia` - Wikipedia summary lookup
//! - `tvdb` - TVDB client, search validation and result formatting
//! - `mcp` - MCP protocol types, the TVDB server and a stdio client
//! - `agent` - Tool calling loop and per-turn orchestration
//! - `cli` - Command line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use movies_buddy::agent::run_movies_buddy_agent;
//! use movies_buddy::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let outcome = run_movies_buddy_agent(&settings, "Who created Dark?", &[], None).await?;
//!     println!("{}", outcome.final_output);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod openai;
pub mod tvdb;
pub mod wikipedia;

pub use error::{MoviesBuddyError, Result};
