//! Chat conversation with a Bedrock model.
//!
//! The Converse API needs an inference profile ID as its `model_id`
//! (e.g. `us.anthropic.claude-sonnet-4-20250514-v1:0`); bare foundation
//! model IDs fail with "on-demand throughput isn't supported".

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, Message, SystemContentBlock};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BedrockError;

pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

pub const SYSTEM_PROMPT: &str = "You are an AI assistant for therapists, helping them with \
case discussions, advice, and creating materials.";

/// Returned in place of an empty model reply.
pub const FALLBACK_REPLY: &str = "I apologize, but I couldn't generate a response.";

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Send a multi-turn conversation to Bedrock and return the assistant's reply.
///
/// An empty reply is replaced by [`FALLBACK_REPLY`].
pub async fn chat_converse(
    client: &Client,
    model_id: &str,
    system_prompt: &str,
    messages: &[ChatMessage],
) -> Result<String, BedrockError> {
    let converse_messages = to_converse_messages(messages)?;

    let response = client
        .converse()
        .model_id(model_id)
        .system(SystemContentBlock::Text(system_prompt.to_string()))
        .set_messages(Some(converse_messages))
        .send()
        .await
        .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

    let output_message = response
        .output()
        .and_then(|o| o.as_message().ok())
        .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

    let reply = reply_text(output_message.content());

    info!(model_id, reply_len = reply.len(), "chat reply received");

    Ok(reply)
}

/// Convert chat messages into Converse API messages.
pub fn to_converse_messages(messages: &[ChatMessage]) -> Result<Vec<Message>, BedrockError> {
    messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                ChatRole::User => ConversationRole::User,
                ChatRole::Assistant => ConversationRole::Assistant,
            };
            Message::builder()
                .role(role)
                .content(ContentBlock::Text(msg.content.clone()))
                .build()
                .map_err(|e| BedrockError::Invocation(e.to_string()))
        })
        .collect()
}

/// Concatenate the text blocks of a reply, falling back to
/// [`FALLBACK_REPLY`] when there is no text.
pub fn reply_text(blocks: &[ContentBlock]) -> String {
    let text = blocks
        .iter()
        .filter_map(|block| {
            if let ContentBlock::Text(text) = block {
                Some(text.as_str())
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        text
    }
}
