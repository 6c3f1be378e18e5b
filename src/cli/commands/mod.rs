//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod mcp;
mod search;
mod summary;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use mcp::run_mcp;
pub use search::run_search;
pub use summary::run_summary;

use super::output::truncate;
