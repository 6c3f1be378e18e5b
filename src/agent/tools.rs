//! Tool definitions and dispatch for the agent.
//!
//! The Wikipedia summary is a local function tool; everything the TVDB MCP
//! server advertises is forwarded to it unchanged.

use crate::error::{MoviesBuddyError, Result};
use crate::mcp::{McpClient, Tool};
use crate::wikipedia::WikipediaClient;
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use serde_json::Value;

pub const SUMMARY_TOOL_NAME: &str = "get_series_movies_summary";

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    /// Fetch a Wikipedia summary for a title.
    GetSeriesMoviesSummary { title: String },

    /// Forward to the MCP server.
    Mcp { name: String, arguments: Value },
}

/// Tool execution context.
pub struct ToolContext {
    pub wikipedia: WikipediaClient,
    pub mcp: Option<McpClient>,
}

impl ToolContext {
    pub fn new(wikipedia: WikipediaClient, mcp: Option<McpClient>) -> Self {
        Self { wikipedia, mcp }
    }

    /// Tools advertised by the attached MCP server, if any.
    pub async fn mcp_tools(&self) -> Result<&[Tool]> {
        match &self.mcp {
            Some(client) => client.list_tools().await,
            None => Ok(&[][..]),
        }
    }

    /// Function definitions for the model: the local tool plus MCP tools.
    pub async fn definitions(&self) -> Result<Vec<ChatCompletionTool>> {
        let mut tools = vec![summary_tool_definition()];
        tools.extend(self.mcp_tools().await?.iter().map(mcp_tool_definition));
        Ok(tools)
    }

    /// Parse a model tool call against the currently available tools.
    pub async fn parse(&self, name: &str, arguments: &str) -> Result<ToolCall> {
        parse_tool_call(name, arguments, self.mcp_tools().await?)
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::GetSeriesMoviesSummary { title } => {
                self.wikipedia.get_series_movies_summary(title).await
            }
            ToolCall::Mcp { name, arguments } => {
                let client = self.mcp.as_ref().ok_or_else(|| {
                    MoviesBuddyError::Agent(format!("No MCP server available for tool: {}", name))
                })?;
                client.call_tool(name, arguments.clone()).await
            }
        }
    }

    /// Stop the attached MCP server.
    pub async fn shutdown(&self) {
        if let Some(client) = &self.mcp {
            client.shutdown().await;
        }
    }
}

/// Definition of the local Wikipedia summary tool.
pub fn summary_tool_definition() -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: SUMMARY_TOOL_NAME.to_string(),
            description: Some(
                "Return a concise Wikipedia summary for a given TV series or movie title. \
                Returns a JSON string with keys: title, summary. If the page is missing, \
                the summary field holds a not-found message."
                    .to_string(),
            ),
            parameters: Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "Exact title of the TV series or movie to summarize."
                    }
                },
                "required": ["title"]
            })),
            strict: None,
        },
    }
}

/// Convert an MCP tool into a function definition.
pub fn mcp_tool_definition(tool: &Tool) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: tool.name.clone(),
            description: Some(tool.description.clone()).filter(|d| !d.is_empty()),
            parameters: Some(tool.input_schema.clone()),
            strict: None,
        },
    }
}

/// Parse a tool call from the model's response format.
pub fn parse_tool_call(name: &str, arguments: &str, mcp_tools: &[Tool]) -> Result<ToolCall> {
    let args: Value = if arguments.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(arguments)
            .map_err(|e| MoviesBuddyError::Agent(format!("Invalid tool arguments: {}", e)))?
    };

    if name == SUMMARY_TOOL_NAME {
        let title = args["title"]
            .as_str()
            .ok_or_else(|| MoviesBuddyError::Agent("Missing 'title' argument".to_string()))?
            .to_string();
        return Ok(ToolCall::GetSeriesMoviesSummary { title });
    }

    if mcp_tools.iter().any(|t| t.name == name) {
        return Ok(ToolCall::Mcp {
            name: name.to_string(),
            arguments: args,
        });
    }

    Err(MoviesBuddyError::Agent(format!("Unknown tool: {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::get_tools;
    use serde_json::json;

    #[test]
    fn test_parse_summary_tool() {
        let tool = parse_tool_call(SUMMARY_TOOL_NAME, r#"{"title": "Foundation"}"#, &[]).unwrap();
        assert_eq!(
            tool,
            ToolCall::GetSeriesMoviesSummary {
                title: "Foundation".to_string()
            }
        );
    }

    #[test]
    fn test_parse_summary_missing_title() {
        let err = parse_tool_call(SUMMARY_TOOL_NAME, "{}", &[]).unwrap_err();
        assert!(err.to_string().contains("Missing 'title'"));
    }

    #[test]
    fn test_parse_mcp_tool() {
        let tools = get_tools();
        let tool = parse_tool_call(
            "search_tv_series_tvdb",
            r#"{"query": "Dark", "content_type": "series"}"#,
            &tools,
        )
        .unwrap();
        match tool {
            ToolCall::Mcp { name, arguments } => {
                assert_eq!(name, "search_tv_series_tvdb");
                assert_eq!(arguments, json!({"query": "Dark", "content_type": "series"}));
            }
            _ => panic!("Expected MCP tool"),
        }
    }

    #[test]
    fn test_parse_mcp_tool_without_server() {
        let err = parse_tool_call("search_tv_series_tvdb", r#"{"query": "Dark"}"#, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Agent error: Unknown tool: search_tv_series_tvdb");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_tool_call(SUMMARY_TOOL_NAME, "{title:", &[]).is_err());
    }

    #[test]
    fn test_mcp_tool_definition() {
        let tools = get_tools();
        let def = mcp_tool_definition(&tools[0]);
        assert_eq!(def.function.name, "search_tv_series_tvdb");
        assert_eq!(def.function.parameters.unwrap()["required"], json!(["query"]));
    }
}
