//! Agent system for answering TV and movie questions with tool calling.
//!
//! Combines the instructions, the hosted model, and two tools: a local
//! Wikipedia summary function and the TVDB search served over MCP.

mod conversation;
mod runner;
mod tools;

pub use conversation::{extract_final_output, trim_history, ChatMessage, Conversation, Role};
pub use runner::{
    run_movies_buddy_agent, run_with_api_key, Agent, AgentResponse, MoviesBuddy, ToolCallRecord,
    TurnOutcome, FAILURE_MESSAGE, TIMEOUT_MESSAGE,
};
pub use tools::{
    mcp_tool_definition, parse_tool_call, summary_tool_definition, ToolCall, ToolContext,
    SUMMARY_TOOL_NAME,
};
