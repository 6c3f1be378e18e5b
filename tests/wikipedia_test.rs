use anyhow::Result;
use httpmock::prelude::*;
use movies_buddy::config::WikipediaSettings;
use movies_buddy::wikipedia::WikipediaClient;
use movies_buddy::MoviesBuddyError;
use serde_json::{json, Value};
use std::time::Duration;

fn client(server: &MockServer) -> Result<WikipediaClient> {
    let settings = WikipediaSettings {
        base_url: Some(server.base_url()),
        ..Default::default()
    };
    Ok(WikipediaClient::new(&settings)?)
}

#[tokio::test]
async fn test_summary_found() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/page/summary/Breaking_Bad");
            then.status(200).json_body(json!({
                "title": "Breaking Bad",
                "extract": "Breaking Bad is an American crime drama television series."
            }));
        })
        .await;

    let output = client(&server)?
        .get_series_movies_summary("Breaking Bad")
        .await?;
    let parsed: Value = serde_json::from_str(&output)?;

    mock.assert_async().await;
    assert_eq!(parsed["title"], "Breaking Bad");
    assert_eq!(
        parsed["summary"],
        "Breaking Bad is an American crime drama television series."
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_page_returns_fallback() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/page/summary/Nonexistent_Show_12345");
            then.status(404).json_body(json!({"type": "not_found"}));
        })
        .await;

    let output = client(&server)?
        .get_series_movies_summary("Nonexistent Show 12345")
        .await?;
    let parsed: Value = serde_json::from_str(&output)?;

    assert_eq!(parsed["title"], "Nonexistent Show 12345");
    assert_eq!(
        parsed["summary"],
        "No Wikipedia summary found for 'Nonexistent Show 12345'."
    );
    Ok(())
}

#[tokio::test]
async fn test_empty_extract_returns_fallback() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/page/summary/Dark");
            then.status(200).json_body(json!({"title": "Dark", "extract": ""}));
        })
        .await;

    let output = client(&server)?.get_series_movies_summary("Dark").await?;
    let parsed: Value = serde_json::from_str(&output)?;

    assert_eq!(parsed["summary"], "No Wikipedia summary found for 'Dark'.");
    Ok(())
}

#[tokio::test]
async fn test_fetch_summary_not_found_error() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/page/summary/Dark");
            then.status(404);
        })
        .await;

    let err = client(&server)?.fetch_summary("Dark").await.unwrap_err();
    assert!(matches!(err, MoviesBuddyError::SummaryNotFound(ref t) if t == "Dark"));
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_reported() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/page/summary/Dark");
            then.status(500);
        })
        .await;

    let err = client(&server)?
        .get_series_movies_summary("Dark")
        .await
        .unwrap_err();
    assert!(matches!(err, MoviesBuddyError::Wikipedia(_)));
    assert!(err
        .to_string()
        .starts_with("Wikipedia summary retrieval failed:"));
    Ok(())
}

#[tokio::test]
async fn test_slow_server_times_out() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/page/summary/Dark");
            then.status(200)
                .delay(Duration::from_secs(5))
                .json_body(json!({"title": "Dark", "extract": "Too late."}));
        })
        .await;

    let settings = WikipediaSettings {
        base_url: Some(server.base_url()),
        request_timeout_secs: 1,
        ..Default::default()
    };
    let err = WikipediaClient::new(&settings)?
        .get_series_movies_summary("Dark")
        .await
        .unwrap_err();

    assert!(matches!(err, MoviesBuddyError::Wikipedia(_)));
    Ok(())
}
