//! TVDB (The TV Database) lookups served by the MCP server.

mod client;
mod search;

pub use client::{SearchQuery, TvdbClient};
pub use search::{format_search_results, SearchParams, TvdbSearchTool};

use crate::config::{TvdbCredentials, TvdbSettings};
use crate::error::Result;

/// Build a fresh search tool for one request. Credentials are read from the
/// environment when not supplied.
pub fn build_search_tool(
    settings: &TvdbSettings,
    credentials: Option<&TvdbCredentials>,
) -> Result<TvdbSearchTool> {
    let credentials = match credentials {
        Some(c) => c.clone(),
        None => TvdbCredentials::from_env()?,
    };
    Ok(TvdbSearchTool::new(TvdbClient::new(settings, credentials)?))
}
