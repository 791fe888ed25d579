use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use solace_bedrock::chat::{self, ChatMessage, SYSTEM_PROMPT};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// `message` is ciphertext produced by the browser with the shared
/// passphrase.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub encrypted_response: String,
}

pub async fn chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = state.cipher.decrypt(&request.message)?;
    if message.trim().is_empty() {
        return Err(ApiError::BadRequest("message is empty".to_string()));
    }

    let reply = chat::chat_converse(
        &state.bedrock,
        &state.settings.chat_model_id,
        SYSTEM_PROMPT,
        &[ChatMessage::user(message)],
    )
    .await?;

    Ok(Json(ChatResponse {
        encrypted_response: state.cipher.encrypt(&reply),
    }))
}
