//! MCP server exposing TVDB search over stdio.

use super::protocol::*;
use super::tools::{get_tools, SEARCH_TOOL_NAME};
use crate::config::{TvdbCredentials, TvdbSettings};
use crate::tvdb::{build_search_tool, SearchParams};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

pub const SERVER_NAME: &str = "tvdb-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server for TVDB search.
pub struct McpServer {
    settings: TvdbSettings,
    credentials: Option<TvdbCredentials>,
}

impl McpServer {
    /// Create a server that reads TVDB credentials from the environment on each call.
    pub fn new(settings: TvdbSettings) -> Self {
        Self {
            settings,
            credentials: None,
        }
    }

    /// Use fixed credentials instead of the environment.
    pub fn with_credentials(mut self, credentials: TvdbCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        info!("{} MCP server starting on stdio", SERVER_NAME);
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve line-delimited JSON-RPC until the reader reaches EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let Some(response) = self.handle_line(&line).await else {
                continue;
            };

            let mut out = serde_json::to_string(&response)?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }

        info!("{} MCP server input closed, shutting down", SERVER_NAME);
        Ok(())
    }

    /// Handle one raw line. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
            }
        };

        // Well-formed JSON that is not a request object.
        let id = value.get("id").filter(|id| !id.is_null()).cloned();
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Invalid request: {}", e);
                Some(JsonRpcResponse::error(id, INVALID_REQUEST, "Invalid Request"))
            }
        }
    }

    /// Handle a single JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        // Notifications never get a response, even malformed ones.
        if request.is_notification() {
            debug!("Received notification: {}", request.method);
            return None;
        }

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "Invalid Request: jsonrpc must be \"2.0\"",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        if let Some(params) = params.and_then(|p| serde_json::from_value::<InitializeParams>(p).ok()) {
            info!(
                "Client {} {} connected (protocol {})",
                params.client_info.name, params.client_info.version, params.protocol_version
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: PeerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        success(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        success(id, &ToolsListResult { tools: get_tools() })
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let result = match params.name.as_str() {
            SEARCH_TOOL_NAME => self.tool_search(params.arguments).await,
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        success(id, &result)
    }

    /// TVDB search tool. A fresh authenticated client is built per call.
    async fn tool_search(&self, args: Option<Value>) -> ToolCallResult {
        let args = match args {
            Some(a) => a,
            None => return ToolCallResult::error("Missing arguments".to_string()),
        };

        let params: SearchParams = match serde_json::from_value(args) {
            Ok(p) => p,
            Err(e) => return ToolCallResult::error(format!("Invalid arguments: {}", e)),
        };

        let mut tool = match build_search_tool(&self.settings, self.credentials.as_ref()) {
            Ok(tool) => tool,
            Err(e) => return ToolCallResult::error(e.to_string()),
        };

        match tool.search(params).await {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => {
                error!("TVDB search tool failed: {}", e);
                ToolCallResult::error(e.to_string())
            }
        }
    }
}

fn success<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, -32603, &format!("Internal error: {}", e)),
    }
}
