//! Summary command: direct Wikipedia lookup.

use crate::config::Settings;
use crate::wikipedia::WikipediaClient;
use anyhow::Result;

/// Run the summary command.
pub async fn run_summary(title: &str, settings: Settings) -> Result<()> {
    let client = WikipediaClient::new(&settings.wikipedia)?;
    let json = client.get_series_movies_summary(title).await?;
    println!("{}", json);
    Ok(())
}
