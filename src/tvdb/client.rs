//! HTTP client for the TVDB v4 API.

use crate::config::{TvdbCredentials, TvdbSettings};
use crate::error::{MoviesBuddyError, Result};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info, instrument};

/// Query parameters accepted by `GET /search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    pub content_type: Option<String>,
    pub year: Option<i64>,
    pub company: Option<String>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    /// Non-empty parameters as (name, value) pairs.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("query", self.query.clone())];
        if let Some(t) = &self.content_type {
            pairs.push(("type", t.clone()));
        }
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(company) = &self.company {
            pairs.push(("company", company.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Client for the TVDB API. Call [`TvdbClient::authenticate`] before searching.
pub struct TvdbClient {
    http: reqwest::Client,
    base_url: String,
    credentials: TvdbCredentials,
    token: Option<String>,
}

impl TvdbClient {
    pub fn new(settings: &TvdbSettings, credentials: TvdbCredentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            credentials,
            token: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Log in and cache the bearer token.
    #[instrument(skip(self))]
    pub async fn authenticate(&mut self) -> Result<()> {
        let login_url = format!("{}/login", self.base_url);
        let payload = json!({
            "apikey": self.credentials.api_key,
            "pin": self.credentials.pin,
        });

        let response = self
            .http
            .post(&login_url)
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| auth_error(format!("TVDB authentication failed: {}", e)))?;

        let data: Value = response
            .json()
            .await
            .map_err(|e| auth_error(format!("TVDB authentication failed: {}", e)))?;

        let token = data
            .pointer("/data/token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                auth_error("TVDB authentication failed: token missing in response.".to_string())
            })?;

        self.token = Some(token.to_string());
        info!("TVDB authentication successful");
        Ok(())
    }

    /// Search TVDB and return the raw JSON response.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &SearchQuery) -> Result<Value> {
        let token = self.token.as_deref().ok_or_else(|| {
            MoviesBuddyError::TvdbAuthentication(
                "Client is not authenticated. Call authenticate() first.".to_string(),
            )
        })?;

        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&query.to_pairs())
            .bearer_auth(token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| request_error(format!("TVDB search failed: {}", e)))?;

        response
            .json()
            .await
            .map_err(|e| request_error(format!("TVDB search failed: {}", e)))
    }
}

fn auth_error(msg: String) -> MoviesBuddyError {
    error!("{}", msg);
    MoviesBuddyError::TvdbAuthentication(msg)
}

fn request_error(msg: String) -> MoviesBuddyError {
    error!("{}", msg);
    MoviesBuddyError::TvdbRequest(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_missing() {
        let query = SearchQuery {
            query: "Dark".to_string(),
            year: Some(2017),
            ..Default::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![("query", "Dark".to_string()), ("year", "2017".to_string())]
        );
    }

    #[tokio::test]
    async fn test_search_requires_token() {
        let credentials = TvdbCredentials {
            api_key: "key".to_string(),
            pin: "pin".to_string(),
        };
        let client = TvdbClient::new(&TvdbSettings::default(), credentials).unwrap();
        assert!(!client.is_authenticated());

        let err = client.search(&SearchQuery::default()).await.unwrap_err();
        assert!(matches!(err, MoviesBuddyError::TvdbAuthentication(_)));
    }
}
