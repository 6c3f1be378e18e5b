//! Wikipedia summary lookup used as the agent's local function tool.

use crate::config::WikipediaSettings;
use crate::error::{MoviesBuddyError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Title and introductory paragraph of a Wikipedia page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikipediaSummary {
    pub title: String,
    pub summary: String,
}

/// Subset of the REST `page/summary` response we read.
#[derive(Debug, Deserialize)]
struct PageSummary {
    title: String,
    #[serde(default)]
    extract: Option<String>,
}

/// Client for the Wikipedia REST API.
pub struct WikipediaClient {
    http: reqwest::Client,
    api_base: String,
}

impl WikipediaClient {
    /// Create a client for the configured language edition.
    pub fn new(settings: &WikipediaSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base: settings.api_base(),
        })
    }

    /// URL of the summary endpoint for `title`.
    fn summary_url(&self, title: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)?;
        url.path_segments_mut()
            .map_err(|_| MoviesBuddyError::Config(format!("Invalid Wikipedia URL: {}", self.api_base)))?
            .extend(["page", "summary"])
            .push(&title.replace(' ', "_"));
        Ok(url)
    }

    /// Fetch the title and summary of a page.
    ///
    /// Returns `SummaryNotFound` when the page is missing or has no summary.
    #[instrument(skip(self))]
    pub async fn fetch_summary(&self, title: &str) -> Result<WikipediaSummary> {
        let title = title.trim();
        if title.is_empty() {
            return Err(MoviesBuddyError::SummaryNotFound(title.to_string()));
        }

        let url = self.summary_url(title)?;
        debug!("Fetching {}", url);

        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(MoviesBuddyError::SummaryNotFound(title.to_string()));
        }

        let page: PageSummary = response.error_for_status()?.json().await?;
        match page.extract {
            Some(extract) if !extract.trim().is_empty() => Ok(WikipediaSummary {
                title: page.title,
                summary: extract,
            }),
            _ => Err(MoviesBuddyError::SummaryNotFound(title.to_string())),
        }
    }

    /// Body of the `get_series_movies_summary` tool.
    ///
    /// Returns a JSON string with `title` and `summary`. A missing page yields
    /// a fallback message in `summary`; other failures are errors.
    pub async fn get_series_movies_summary(&self, title: &str) -> Result<String> {
        let summary = match self.fetch_summary(title).await {
            Ok(summary) => summary,
            Err(MoviesBuddyError::SummaryNotFound(_)) => {
                info!("No Wikipedia summary found for title={:?}", title);
                WikipediaSummary {
                    title: title.to_string(),
                    summary: format!("No Wikipedia summary found for '{}'.", title),
                }
            }
            Err(e) => {
                error!("Failed to retrieve Wikipedia summary for title={:?}: {}", title, e);
                return Err(MoviesBuddyError::Wikipedia(format!(
                    "Wikipedia summary retrieval failed: {}",
                    e
                )));
            }
        };

        Ok(serde_json::to_string(&summary)?)
    }
}
