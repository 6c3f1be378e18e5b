//! Agent runner with tool calling loop.

use super::conversation::{extract_final_output, trim_history, ChatMessage, Conversation};
use super::tools::ToolContext;
use crate::config::{load_instructions, resolve_api_key, Settings};
use crate::error::{MoviesBuddyError, Result};
use crate::mcp::McpClient;
use crate::openai::create_client;
use crate::wikipedia::WikipediaClient;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, CreateChatCompletionRequestArgs,
};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Reply used when a run exceeds its time budget.
pub const TIMEOUT_MESSAGE: &str = "Request timed out.";
/// Reply used when a run fails for any other reason.
pub const FAILURE_MESSAGE: &str = "The agent failed to run.";

/// Agent that answers TV and movie questions using its tools.
pub struct Agent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    name: String,
    model: String,
    tools: ToolContext,
    max_iterations: usize,
    instructions: String,
}

impl Agent {
    /// Create a new agent with the given tool context.
    pub fn new(tools: ToolContext, settings: &Settings, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: create_client(&settings.model, api_key)?,
            name: settings.agent.name.clone(),
            model: settings.model.name.clone(),
            tools,
            max_iterations: settings.agent.max_iterations,
            instructions: load_instructions(&settings.prompts)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &ToolContext {
        &self.tools
    }

    /// Run one user turn on top of `history`.
    pub async fn run(&self, history: &[ChatMessage], user_input: &str) -> Result<AgentResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.instructions.clone())
                .build()
                .map_err(|e| MoviesBuddyError::Agent(e.to_string()))?
                .into(),
        ];

        let mut conversation: Conversation = history.to_vec();
        conversation.push(ChatMessage::user(user_input));
        for message in &conversation {
            messages.push(message.to_request()?);
        }

        let tool_definitions = self.tools.definitions().await?;
        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(MoviesBuddyError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(tool_definitions.clone())
                .build()
                .map_err(|e| MoviesBuddyError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| MoviesBuddyError::OpenAI(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| MoviesBuddyError::Agent("No response from model".to_string()))?;

            let tool_calls = match &choice.message.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => {
                    let content = choice.message.content.clone().unwrap_or_default();
                    if content.trim().is_empty() {
                        warn!("Model returned an empty reply");
                    } else {
                        conversation.push(ChatMessage::assistant(content.clone()));
                    }
                    return Ok(AgentResponse {
                        content,
                        tool_calls: tool_calls_made,
                        iterations,
                        conversation,
                    });
                }
            };

            // Add assistant message with tool calls to history
            let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(tool_calls.clone())
                .build()
                .map_err(|e| MoviesBuddyError::Agent(e.to_string()))?;
            messages.push(assistant_msg.into());

            for tool_call in tool_calls {
                let record = self.execute_tool_call(tool_call).await;

                let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(&tool_call.id)
                    .content(record.result.clone())
                    .build()
                    .map_err(|e| MoviesBuddyError::Agent(e.to_string()))?;
                messages.push(tool_msg.into());

                tool_calls_made.push(record);
            }
        }
    }

    /// Execute a single tool call. Failures are reported back to the model as text.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match self.tools.parse(name, arguments).await {
            Ok(tool) => match self.tools.execute(&tool).await {
                Ok(output) => output,
                Err(e) => {
                    warn!("Tool {} failed: {}", name, e);
                    format!("Tool error: {}", e)
                }
            },
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
    /// History including this turn's user and assistant messages.
    pub conversation: Conversation,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

/// Outcome of one turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub conversation: Conversation,
    pub final_output: String,
    pub tool_calls: Vec<ToolCallRecord>,
}

impl TurnOutcome {
    fn fallback(history: &[ChatMessage], message: &str) -> Self {
        Self {
            conversation: history.to_vec(),
            final_output: message.to_string(),
            tool_calls: Vec::new(),
        }
    }
}

/// A configured agent plus its running MCP server, reusable across turns.
pub struct MoviesBuddy {
    agent: Agent,
    max_history_messages: usize,
}

impl MoviesBuddy {
    /// Build the agent and start the TVDB MCP server if enabled.
    pub async fn start(settings: &Settings, api_key: &str) -> Result<Self> {
        let wikipedia = WikipediaClient::new(&settings.wikipedia)?;

        let mcp = if settings.agent.enable_tvdb_mcp {
            Some(McpClient::spawn("tvdb-stdio", &settings.mcp, settings.source.as_deref()).await?)
        } else {
            None
        };

        let agent = Agent::new(ToolContext::new(wikipedia, mcp), settings, api_key)?;

        info!("Created {} agent with model {}", agent.name(), agent.model());
        Ok(Self {
            agent,
            max_history_messages: settings.agent.max_history_messages,
        })
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Run one turn with an optional time budget.
    ///
    /// Never fails: timeouts and errors produce a fallback reply and leave
    /// `history` unchanged.
    pub async fn turn(
        &self,
        history: &[ChatMessage],
        user_input: &str,
        timeout: Option<Duration>,
    ) -> TurnOutcome {
        let run = self.agent.run(history, user_input);
        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .unwrap_or(Err(MoviesBuddyError::Timeout(limit))),
            None => run.await,
        };

        match result {
            Ok(response) => {
                let mut conversation = response.conversation;
                let final_output = extract_final_output(&conversation, &response.content);
                trim_history(&mut conversation, self.max_history_messages);
                info!(
                    "{} agent run completed in {} iteration(s)",
                    self.agent.name(),
                    response.iterations
                );
                TurnOutcome {
                    conversation,
                    final_output,
                    tool_calls: response.tool_calls,
                }
            }
            Err(MoviesBuddyError::Timeout(limit)) => {
                warn!("{} agent run timed out after {:?}", self.agent.name(), limit);
                TurnOutcome::fallback(history, TIMEOUT_MESSAGE)
            }
            Err(e) => {
                error!("{} agent run failed: {}", self.agent.name(), e);
                TurnOutcome::fallback(history, FAILURE_MESSAGE)
            }
        }
    }

    /// Stop the MCP server.
    pub async fn shutdown(&self) {
        self.agent.tools().shutdown().await;
    }
}

/// Run a single agent turn using the API key from the environment.
///
/// Only a missing API key is returned as an error; every other failure is
/// turned into a fallback reply.
pub async fn run_movies_buddy_agent(
    settings: &Settings,
    user_input: &str,
    history: &[ChatMessage],
    timeout: Option<Duration>,
) -> Result<TurnOutcome> {
    let api_key = resolve_api_key()?;
    Ok(run_with_api_key(settings, &api_key, user_input, history, timeout).await)
}

/// Run a single agent turn with an explicit API key.
pub async fn run_with_api_key(
    settings: &Settings,
    api_key: &str,
    user_input: &str,
    history: &[ChatMessage],
    timeout: Option<Duration>,
) -> TurnOutcome {
    let buddy = match MoviesBuddy::start(settings, api_key).await {
        Ok(buddy) => buddy,
        Err(e) => {
            error!("Failed to start agent: {}", e);
            return TurnOutcome::fallback(history, FAILURE_MESSAGE);
        }
    };

    let outcome = buddy.turn(history, user_input, timeout).await;
    buddy.shutdown().await;
    outcome
}
