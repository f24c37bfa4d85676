use crate::rest::schemas::{ChatRequest, ChatResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use retail_runner::Chatbot;
use retail_session::HistoryMessage;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct ChatController {
    chatbot: Arc<Chatbot>,
}

impl ChatController {
    pub fn new(chatbot: Arc<Chatbot>) -> Self {
        Self { chatbot }
    }
}

/// `POST /api/v1/chat`: run one turn through the agent pipeline. The
/// chatbot resolves the session and always answers with a well-formed
/// envelope; only transport-level problems surface as HTTP errors.
pub async fn chat(
    State(controller): State<ChatController>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    if request.message.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let outcome = controller
        .chatbot
        .chat(&request.message, request.session_id.as_deref(), &request.customer_id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "chat turn failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ChatResponse::from(outcome)))
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub history: Vec<HistoryMessage>,
}

pub async fn session_history(
    State(controller): State<ChatController>,
    Path(session_id): Path<String>,
) -> Json<HistoryResponse> {
    let history = controller.chatbot.history(&session_id, 50).await;
    Json(HistoryResponse { session_id, history })
}

pub async fn reset_session(
    State(controller): State<ChatController>,
    Path(session_id): Path<String>,
) -> StatusCode {
    if controller.chatbot.reset_session(&session_id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

pub async fn delete_session(
    State(controller): State<ChatController>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let removed = controller
        .chatbot
        .delete_session(&session_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if removed { Ok(StatusCode::NO_CONTENT) } else { Ok(StatusCode::NOT_FOUND) }
}
