//! MCP command implementation.

use crate::config::Settings;
use crate::mcp::McpServer;
use anyhow::Result;

/// Run the TVDB MCP server.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    let server = McpServer::new(settings.tvdb);
    server.run().await
}
