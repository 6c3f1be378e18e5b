//! Validated TVDB search with text formatting for the model.

use super::client::{SearchQuery, TvdbClient};
use crate::error::{MoviesBuddyError, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use tracing::{debug, info, warn};

const VALID_CONTENT_TYPES: [&str; 4] = ["series", "movie", "person", "company"];
const OVERVIEW_MAX_CHARS: usize = 200;

/// Arguments of the `search_tv_series_tvdb` tool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_int")]
    pub year: Option<i64>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default = "default_limit", deserialize_with = "lenient_int")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

/// Integer value of `n`, also accepting whole floats such as `5.0`.
fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = Number::deserialize(deserializer)?;
    whole_number(&n).ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", n)))
}

fn lenient_opt_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        Some(n) => whole_number(&n)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", n))),
        None => Ok(None),
    }
}

impl SearchParams {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            content_type: None,
            year: None,
            company: None,
            limit: default_limit(),
        }
    }

    /// Validate and normalize into API query parameters.
    pub fn into_query(self) -> Result<SearchQuery> {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return Err(MoviesBuddyError::InvalidInput(
                "query is required and cannot be empty.".to_string(),
            ));
        }

        if !(1..=20).contains(&self.limit) {
            return Err(MoviesBuddyError::InvalidInput(
                "limit must be between 1 and 20.".to_string(),
            ));
        }

        let content_type = self
            .content_type
            .filter(|t| !t.is_empty())
            .map(|t| {
                let normalized = t.to_lowercase();
                if !VALID_CONTENT_TYPES.contains(&normalized.as_str()) {
                    warn!("Invalid content_type '{}', proceeding anyway.", t);
                }
                normalized
            });

        let company = self
            .company
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(SearchQuery {
            query,
            content_type,
            year: self.year,
            company,
            limit: Some(self.limit as u32),
        })
    }
}

/// Search helper that authenticates a client and formats its results.
pub struct TvdbSearchTool {
    client: TvdbClient,
}

impl TvdbSearchTool {
    pub fn new(client: TvdbClient) -> Self {
        Self { client }
    }

    /// Authenticate if needed, search, and return formatted results.
    pub async fn search(&mut self, params: SearchParams) -> Result<String> {
        let query = params.into_query()?;

        if !self.client.is_authenticated() {
            self.client.authenticate().await?;
        }

        info!("Searching TVDB with parameters: {:?}", query.to_pairs());
        let results = self.client.search(&query).await?;
        debug!("TVDB raw search response: {}", results);

        let formatted = format_search_results(&results);
        debug!("TVDB formatted search output:\n{}", formatted);
        info!("TVDB search completed successfully for query: '{}'", query.query);
        Ok(formatted)
    }
}

/// Format a TVDB search response into text for the model.
pub fn format_search_results(results: &Value) -> String {
    let items = match results.get("data").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items,
        _ => return "No results found for the search query.".to_string(),
    };

    let mut lines = vec![format!("Found {} results:\n", items.len())];
    for (i, item) in items.iter().enumerate() {
        lines.extend(format_item(i + 1, item));
    }
    lines.join("\n")
}

fn format_item(index: usize, item: &Value) -> Vec<String> {
    let name = field(item, "name");
    let item_type = title_case(&field(item, "type"));
    let year = field(item, "year");
    let tvdb_id = item
        .get("tvdb_id")
        .filter(|v| is_present(v))
        .or_else(|| item.get("id"))
        .map(display)
        .unwrap_or_else(|| "N/A".to_string());

    let mut lines = vec![
        format!("{}. **{}** ({}, {})", index, name, item_type, year),
        format!("   - TVDB ID: {}", tvdb_id),
    ];

    if let Some(overview) = item.get("overview").and_then(Value::as_str) {
        if !overview.is_empty() {
            lines.push(format!("   - Overview: {}", truncate(overview, OVERVIEW_MAX_CHARS)));
        }
    }

    if let Some(companies) = non_empty_array(item, "companies") {
        lines.push(format!("   - Networks/Companies: {}", names(companies, 3)));
    }

    if let Some(genres) = non_empty_array(item, "genres") {
        lines.push(format!("   - Genres: {}", names(genres, 5)));
    }

    lines
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field(item: &Value, key: &str) -> String {
    item.get(key)
        .filter(|v| !v.is_null())
        .map(display)
        .unwrap_or_else(|| "N/A".to_string())
}

fn non_empty_array<'a>(item: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    item.get(key).and_then(Value::as_array).filter(|a| !a.is_empty())
}

/// Join the first `max` entries, which may be strings or objects with a `name`.
fn names(entries: &[Value], max: usize) -> String {
    entries
        .iter()
        .take(max)
        .map(|entry| match entry {
            Value::Object(_) => field(entry, "name"),
            other => display(other),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Truncate to `max` characters with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_empty_results() {
        assert_eq!(
            format_search_results(&json!({"data": []})),
            "No results found for the search query."
        );
        assert_eq!(
            format_search_results(&json!({})),
            "No results found for the search query."
        );
    }

    #[test]
    fn test_format_full_item() {
        let results = json!({
            "data": [{
                "name": "Foundation",
                "type": "series",
                "year": "2021",
                "tvdb_id": "366972",
                "overview": "A complex saga of humans scattered on planets throughout the galaxy.",
                "companies": ["Apple TV+", "Skydance Television", "Phantom Four", "Extra"],
                "genres": [{"name": "Drama"}, {"name": "Science Fiction"}]
            }]
        });

        let text = format_search_results(&results);
        assert_eq!(
            text,
            "Found 1 results:\n\n\
             1. **Foundation** (Series, 2021)\n   \
             - TVDB ID: 366972\n   \
             - Overview: A complex saga of humans scattered on planets throughout the galaxy.\n   \
             - Networks/Companies: Apple TV+, Skydance Television, Phantom Four\n   \
             - Genres: Drama, Science Fiction"
        );
    }

    #[test]
    fn test_format_missing_fields() {
        let text = format_search_results(&json!({"data": [{"id": "movie-42"}]}));
        assert!(text.contains("1. **N/A** (N/A, N/A)"));
        assert!(text.contains("- TVDB ID: movie-42"));
        assert!(!text.contains("Overview"));
    }

    #[test]
    fn test_overview_truncated() {
        let overview = "x".repeat(250);
        let text = format_search_results(&json!({"data": [{"name": "Long", "overview": overview}]}));
        assert!(text.contains(&format!("- Overview: {}...", "x".repeat(200))));
    }

    #[test]
    fn test_params_validation() {
        let err = SearchParams::new("   ").into_query().unwrap_err();
        assert_eq!(err.to_string(), "query is required and cannot be empty.");

        let mut params = SearchParams::new("Dark");
        params.limit = 21;
        assert_eq!(
            params.into_query().unwrap_err().to_string(),
            "limit must be between 1 and 20."
        );
    }

    #[test]
    fn test_params_normalization() {
        let params: SearchParams = serde_json::from_value(json!({
            "query": "  The Office ",
            "content_type": "SERIES",
            "company": " NBC ",
            "year": 2005
        }))
        .unwrap();

        let query = params.into_query().unwrap();
        assert_eq!(query.query, "The Office");
        assert_eq!(query.content_type.as_deref(), Some("series"));
        assert_eq!(query.company.as_deref(), Some("NBC"));
        assert_eq!(query.year, Some(2005));
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_unknown_content_type_forwarded() {
        let mut params = SearchParams::new("Pixar");
        params.content_type = Some("Studio".to_string());
        let query = params.into_query().unwrap();
        assert_eq!(query.content_type.as_deref(), Some("studio"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("series"), "Series");
        assert_eq!(title_case("MOVIE"), "Movie");
        assert_eq!(title_case("N/A"), "N/A");
        assert_eq!(title_case("tv series"), "Tv Series");
    }

    #[test]
    fn test_params_accept_whole_floats() {
        let params: SearchParams =
            serde_json::from_value(json!({"query": "Dark", "limit": 5.0, "year": 2017.0})).unwrap();
        assert_eq!(params.limit, 5);
        assert_eq!(params.year, Some(2017));

        let params: SearchParams =
            serde_json::from_value(json!({"query": "Dark", "year": null})).unwrap();
        assert_eq!(params.year, None);
        assert_eq!(params.limit, 10);
    }

    #[test]
    fn test_params_reject_fractional_numbers() {
        let err = serde_json::from_value::<SearchParams>(json!({"query": "Dark", "limit": 2.5}))
            .unwrap_err();
        assert!(err.to_string().contains("expected an integer"));
        assert!(serde_json::from_value::<SearchParams>(json!({"query": "Dark", "year": 2017.4})).is_err());
    }
}
