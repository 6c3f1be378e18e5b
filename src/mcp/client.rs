//! MCP client with stdio transport.
//!
//! Spawns the MCP server as a subprocess, performs the initialize handshake,
//! and issues sequential JSON-RPC requests over its stdin/stdout.

use super::protocol::*;
use crate::config::McpSettings;
use crate::error::{MoviesBuddyError, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

const CLIENT_NAME: &str = "movies-buddy";

type Reader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type Writer = Box<dyn AsyncWrite + Send + Unpin>;

struct Transport {
    reader: Reader,
    writer: Writer,
}

/// An initialized connection to one MCP server.
pub struct McpClient {
    name: String,
    transport: Mutex<Transport>,
    child: Mutex<Option<Child>>,
    next_id: AtomicU64,
    request_timeout: Duration,
    server_info: Option<PeerInfo>,
    tools: OnceCell<Vec<Tool>>,
}

impl McpClient {
    /// Spawn the configured server process and initialize it.
    ///
    /// When the server is this binary, `config_path` is forwarded as
    /// `--config` so both processes read the same settings.
    pub async fn spawn(
        name: &str,
        settings: &McpSettings,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let program = match &settings.command {
            Some(cmd) => PathBuf::from(cmd),
            None => std::env::current_exe()?,
        };
        let args = server_args(settings, config_path);

        info!("Starting MCP server '{}': {} {:?}", name, program.display(), args);

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                MoviesBuddyError::Mcp(format!("failed to spawn {}: {}", program.display(), e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MoviesBuddyError::Mcp("server stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MoviesBuddyError::Mcp("server stdout unavailable".to_string()))?;

        let mut client = Self::from_transport(
            name,
            stdout,
            stdin,
            Duration::from_secs(settings.request_timeout_secs),
        );
        *client.child.get_mut() = Some(child);

        client.initialize().await?;
        Ok(client)
    }

    /// Wrap an existing transport. Call [`McpClient::initialize`] before use.
    pub fn from_transport<R, W>(name: &str, reader: R, writer: W, request_timeout: Duration) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(reader);
        Self {
            name: name.to_string(),
            transport: Mutex::new(Transport {
                reader: BufReader::new(reader),
                writer: Box::new(writer),
            }),
            child: Mutex::new(None),
            next_id: AtomicU64::new(1),
            request_timeout,
            server_info: None,
            tools: OnceCell::new(),
        }
    }

    pub fn server_info(&self) -> Option<&PeerInfo> {
        self.server_info.as_ref()
    }

    /// Perform the `initialize` handshake and send `notifications/initialized`.
    pub async fn initialize(&mut self) -> Result<()> {
        let params = InitializeParams {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: json!({}),
            client_info: PeerInfo {
                name: CLIENT_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        let result = self
            .request("initialize", Some(serde_json::to_value(params)?))
            .await?;
        let init: InitializeResult = serde_json::from_value(result)?;

        if init.protocol_version != PROTOCOL_VERSION {
            warn!(
                "MCP server '{}' negotiated protocol {} (requested {})",
                self.name, init.protocol_version, PROTOCOL_VERSION
            );
        }
        info!(
            "Connected to MCP server '{}' ({} {})",
            self.name, init.server_info.name, init.server_info.version
        );
        self.server_info = Some(init.server_info);

        self.notify("notifications/initialized", None).await
    }

    /// Send a request and wait for the response with the same id.
    pub async fn request(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);

        let mut transport = self.transport.lock().await;
        write_message(&mut transport.writer, &request).await?;

        let response = tokio::time::timeout(self.request_timeout, read_response(&mut transport.reader, id))
            .await
            .map_err(|_| MoviesBuddyError::Mcp(format!("request '{}' timed out", method)))??;

        response
            .into_result()
            .map_err(|e| MoviesBuddyError::Mcp(format!("server error: {}", e)))
    }

    /// Send a notification (no response expected).
    pub async fn notify(&self, method: &str, params: Option<Value>) -> Result<()> {
        let notification = JsonRpcRequest::notification(method, params);
        let mut transport = self.transport.lock().await;
        write_message(&mut transport.writer, &notification).await
    }

    /// Tools offered by the server, fetched once and cached.
    pub async fn list_tools(&self) -> Result<&[Tool]> {
        let tools = self
            .tools
            .get_or_try_init(|| async {
                let result = self.request("tools/list", None).await?;
                let list: ToolsListResult = serde_json::from_value(result)?;
                debug!("MCP server '{}' offers {} tool(s)", self.name, list.tools.len());
                Ok::<_, MoviesBuddyError>(list.tools)
            })
            .await?;
        Ok(tools.as_slice())
    }

    /// Call a tool and return its text content. Tool-reported errors become `Mcp` errors.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<String> {
        let params = ToolCallParams {
            name: name.to_string(),
            arguments: Some(arguments),
        };
        let result = self
            .request("tools/call", Some(serde_json::to_value(params)?))
            .await?;
        let result: ToolCallResult = serde_json::from_value(result)?;

        if result.is_error() {
            return Err(MoviesBuddyError::Mcp(result.joined_text()));
        }
        Ok(result.joined_text())
    }

    /// Stop the server process, if this client owns one.
    pub async fn shutdown(&self) {
        if let Some(mut child) = self.child.lock().await.take() {
            if let Err(e) = child.kill().await {
                warn!("Failed to stop MCP server '{}': {}", self.name, e);
            } else {
                debug!("MCP server '{}' stopped", self.name);
            }
        }
    }
}

/// Arguments for the server process.
fn server_args(settings: &McpSettings, config_path: Option<&Path>) -> Vec<String> {
    let mut args = settings.args.clone();
    if settings.command.is_none() {
        if let Some(path) = config_path {
            args.push("--config".to_string());
            args.push(path.display().to_string());
        }
    }
    args
}

async fn write_message(writer: &mut Writer, message: &JsonRpcRequest) -> Result<()> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Read lines until the response for `id` arrives, skipping server
/// notifications and unrelated responses.
async fn read_response(reader: &mut Reader, id: u64) -> Result<JsonRpcResponse> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(MoviesBuddyError::Mcp("server closed the connection".to_string()));
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                warn!("Ignoring malformed MCP message: {}", e);
                continue;
            }
        };

        if value.get("method").is_some() {
            debug!("Ignoring server message: {}", value["method"]);
            continue;
        }

        if value.get("id").and_then(Value::as_u64) != Some(id) {
            debug!("Ignoring response for another request: {}", value["id"]);
            continue;
        }

        return Ok(serde_json::from_value(value)?);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[test]
    fn test_server_args_forward_config() {
        let settings = McpSettings::default();
        assert_eq!(server_args(&settings, None), vec!["mcp"]);
        assert_eq!(
            server_args(&settings, Some(Path::new("/tmp/movies.toml"))),
            vec!["mcp", "--config", "/tmp/movies.toml"]
        );
    }

    #[test]
    fn test_server_args_custom_command_untouched() {
        let settings = McpSettings {
            command: Some("tvdb-server".to_string()),
            args: vec!["--stdio".to_string()],
            ..Default::default()
        };
        assert_eq!(
            server_args(&settings, Some(Path::new("/tmp/movies.toml"))),
            vec!["--stdio"]
        );
    }

    #[tokio::test]
    async fn test_request_skips_notifications_and_stale_ids() {
        let (client_io, server_io) = duplex(4096);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (server_read, mut server_write) = tokio::io::split(server_io);

        let client =
            McpClient::from_transport("test", client_read, client_write, Duration::from_secs(5));

        let server = tokio::spawn(async move {
            let mut lines = BufReader::new(server_read).lines();
            let request = lines.next_line().await.unwrap().unwrap();
            let request: JsonRpcRequest = serde_json::from_str(&request).unwrap();
            assert_eq!(request.method, "ping");

            let reply = concat!(
                r#"{"jsonrpc":"2.0","method":"notifications/message","params":{}}"#,
                "\n",
                r#"{"jsonrpc":"2.0","id":999,"result":{"stale":true}}"#,
                "\n",
                r#"{"jsonrpc":"2.0","id":1,"result":{"pong":true}}"#,
                "\n"
            );
            server_write.write_all(reply.as_bytes()).await.unwrap();
        });

        let result = client.request("ping", None).await.unwrap();
        assert_eq!(result, json!({"pong": true}));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_connection() {
        let (client_io, server_io) = duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_io);
        drop(server_io);

        let client =
            McpClient::from_transport("test", client_read, client_write, Duration::from_secs(1));
        assert!(client.request("ping", None).await.is_err());
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let (client_io, _server_io) = duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_io);

        let client =
            McpClient::from_transport("test", client_read, client_write, Duration::from_millis(50));
        let err = client.request("ping", None).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
