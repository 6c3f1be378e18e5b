//! Chat history carried between agent turns.

use crate::error::{MoviesBuddyError, Result};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestUserMessageArgs,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One user or assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Convert into a chat completions request message.
    pub fn to_request(&self) -> Result<ChatCompletionRequestMessage> {
        let message = match self.role {
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(self.content.clone())
                .build()
                .map_err(|e| MoviesBuddyError::Agent(e.to_string()))?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(self.content.clone())
                .build()
                .map_err(|e| MoviesBuddyError::Agent(e.to_string()))?
                .into(),
        };
        Ok(message)
    }
}

pub type Conversation = Vec<ChatMessage>;

/// Return `fallback` if non-empty, otherwise the content of the last
/// message when it is an assistant reply.
pub fn extract_final_output(conversation: &[ChatMessage], fallback: &str) -> String {
    if !fallback.is_empty() {
        return fallback.to_string();
    }
    conversation
        .last()
        .filter(|m| m.role == Role::Assistant)
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

/// Keep only the most recent `max_messages` messages.
pub fn trim_history(conversation: &mut Conversation, max_messages: usize) {
    if conversation.len() > max_messages {
        let excess = conversation.len() - max_messages;
        conversation.drain(..excess);
    }
}
