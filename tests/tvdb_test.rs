use anyhow::Result;
use httpmock::prelude::*;
use movies_buddy::config::{TvdbCredentials, TvdbSettings};
use movies_buddy::mcp::{McpClient, McpServer};
use movies_buddy::tvdb::{build_search_tool, SearchParams};
use movies_buddy::MoviesBuddyError;
use serde_json::json;
use std::time::Duration;
use tokio::io::{duplex, split, BufReader};

fn settings(server: &MockServer) -> TvdbSettings {
    TvdbSettings {
        base_url: server.base_url(),
        ..Default::default()
    }
}

fn credentials() -> TvdbCredentials {
    TvdbCredentials {
        api_key: "test-key".to_string(),
        pin: "1234".to_string(),
    }
}

async fn mock_login(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/login")
                .json_body(json!({"apikey": "test-key", "pin": "1234"}));
            then.status(200)
                .json_body(json!({"status": "success", "data": {"token": "tok-123"}}));
        })
        .await
}

fn dark_results() -> serde_json::Value {
    json!({
        "status": "success",
        "data": [{
            "name": "Dark",
            "type": "series",
            "year": "2017",
            "tvdb_id": "334824",
            "overview": "A family saga with a supernatural twist.",
            "companies": ["Netflix"],
            "genres": ["Drama", "Mystery", "Science Fiction"]
        }]
    })
}

#[tokio::test]
async fn test_search_authenticates_and_formats() -> Result<()> {
    let server = MockServer::start_async().await;
    let login = mock_login(&server).await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .header("authorization", "Bearer tok-123")
                .query_param("query", "Dark")
                .query_param("type", "series")
                .query_param("year", "2017")
                .query_param("limit", "5");
            then.status(200).json_body(dark_results());
        })
        .await;

    let mut tool = build_search_tool(&settings(&server), Some(&credentials()))?;
    let params = SearchParams {
        content_type: Some("Series".to_string()),
        year: Some(2017),
        limit: 5,
        ..SearchParams::new("Dark")
    };
    let output = tool.search(params).await?;

    login.assert_async().await;
    search.assert_async().await;
    assert!(output.starts_with("Found 1 results:\n"));
    assert!(output.contains("1. **Dark** (Series, 2017)"));
    assert!(output.contains("   - TVDB ID: 334824"));
    assert!(output.contains("   - Networks/Companies: Netflix"));
    assert!(output.contains("   - Genres: Drama, Mystery, Science Fiction"));
    Ok(())
}

#[tokio::test]
async fn test_search_without_results() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_login(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(json!({"status": "success", "data": []}));
        })
        .await;

    let mut tool = build_search_tool(&settings(&server), Some(&credentials()))?;
    let output = tool.search(SearchParams::new("zzzz")).await?;

    assert_eq!(output, "No results found for the search query.");
    Ok(())
}

#[tokio::test]
async fn test_login_failure() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(401).json_body(json!({"status": "failure"}));
        })
        .await;

    let mut tool = build_search_tool(&settings(&server), Some(&credentials()))?;
    let err = tool.search(SearchParams::new("Dark")).await.unwrap_err();

    assert!(matches!(err, MoviesBuddyError::TvdbAuthentication(_)));
    assert!(err.to_string().contains("TVDB authentication failed"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_params_skip_http() -> Result<()> {
    let server = MockServer::start_async().await;
    let login = mock_login(&server).await;

    let mut tool = build_search_tool(&settings(&server), Some(&credentials()))?;

    let err = tool.search(SearchParams::new("   ")).await.unwrap_err();
    assert_eq!(err.to_string(), "query is required and cannot be empty.");

    let params = SearchParams {
        limit: 21,
        ..SearchParams::new("Dark")
    };
    let err = tool.search(params).await.unwrap_err();
    assert_eq!(err.to_string(), "limit must be between 1 and 20.");

    login.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_mcp_server_search_over_stdio_transport() -> Result<()> {
    let tvdb = MockServer::start_async().await;
    mock_login(&tvdb).await;
    let search = tvdb
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("query", "Dark")
                .query_param("limit", "5");
            then.status(200).json_body(dark_results());
        })
        .await;

    let (client_io, server_io) = duplex(64 * 1024);
    let (client_read, client_write) = split(client_io);
    let (server_read, server_write) = split(server_io);

    let server = McpServer::new(settings(&tvdb)).with_credentials(credentials());
    let server_task =
        tokio::spawn(async move { server.serve(BufReader::new(server_read), server_write).await });

    let mut client =
        McpClient::from_transport("tvdb-test", client_read, client_write, Duration::from_secs(5));
    client.initialize().await?;

    assert_eq!(
        client.server_info().map(|info| info.name.as_str()),
        Some("tvdb-mcp")
    );

    let tools = client.list_tools().await?;
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "search_tv_series_tvdb");

    let text = client
        .call_tool("search_tv_series_tvdb", json!({"query": "Dark", "limit": 5.0}))
        .await?;
    search.assert_async().await;
    assert!(text.contains("1. **Dark** (Series, 2017)"));

    let err = client
        .call_tool("search_tv_series_tvdb", json!({"query": ""}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("query is required and cannot be empty."));

    drop(client);
    server_task.await??;
    Ok(())
}
