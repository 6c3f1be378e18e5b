//! MCP (Model Context Protocol) plumbing.
//!
//! The server exposes TVDB search as a tool over stdio; the client lets the
//! agent spawn that server and call its tools. Both speak line-delimited
//! JSON-RPC 2.0.

mod client;
mod protocol;
mod server;
mod tools;

pub use client::McpClient;
pub use protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, PeerInfo, Tool, ToolCallResult, ToolContent,
    ToolsListResult, PROTOCOL_VERSION,
};
pub use server::{McpServer, SERVER_NAME};
pub use tools::{get_tools, SEARCH_TOOL_NAME};
