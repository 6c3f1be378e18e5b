//! Search command: direct TVDB search.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::tvdb::{build_search_tool, SearchParams};
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    content_type: Option<String>,
    year: Option<i64>,
    company: Option<String>,
    limit: i64,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::TvdbSearch) {
        Output::error(&format!("{}", e));
        Output::info("Run 'movies-buddy doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let params = SearchParams {
        query: query.to_string(),
        content_type,
        year,
        company,
        limit,
    };

    let mut tool = build_search_tool(&settings.tvdb, None)?;

    let spinner = Output::spinner("Searching TVDB...");
    let result = tool.search(params).await;
    spinner.finish_and_clear();

    println!("{}", result?);
    Ok(())
}
