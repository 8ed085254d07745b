use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    extractors::AppJson,
    services::{chat_service::ChatService, AppState},
};

#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub message: String,
}

/// POST /api/chat - Tutoring assistant proxy. Always answers 200; backend
/// trouble turns into an apologetic reply rather than an error status.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<ChatPayload>,
) -> impl IntoResponse {
    let message = payload.message.trim();
    if message.is_empty() {
        return Json(json!({
            "success": false,
            "response": "Please enter a message."
        }));
    }

    let reply = ChatService::new(&state.config).reply(message).await;
    Json(json!({ "success": true, "response": reply }))
}
