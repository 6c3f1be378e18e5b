//! MCP tool definitions for the TVDB server.

use super::protocol::Tool;
use serde_json::json;

pub const SEARCH_TOOL_NAME: &str = "search_tv_series_tvdb";

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![Tool {
        name: SEARCH_TOOL_NAME.to_string(),
        description: "Search The TV Database (TVDB) for TV and movie information. \
            Returns structured results with titles, years, genres, networks, and descriptions."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Main search term for TV series, movies, or other entertainment content."
                },
                "content_type": {
                    "type": "string",
                    "description": "Optional filter: 'series', 'movie', 'person', or 'company'."
                },
                "year": {
                    "type": "integer",
                    "description": "Filter results by release/premiere year."
                },
                "company": {
                    "type": "string",
                    "description": "Restrict results to a specific production company or network."
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results (1-20). Defaults to 10.",
                    "minimum": 1,
                    "maximum": 20,
                    "default": 10
                }
            },
            "required": ["query"]
        }),
    }]
}
