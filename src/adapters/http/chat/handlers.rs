//! HTTP handlers for the chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::application::{ConversationManager, ManagerError};

use super::dto::{ChatMessageRequest, ChatMessageResponse, ErrorResponse, SessionResponse};

/// Shared handler state.
#[derive(Clone)]
pub struct ChatHandlers {
    manager: Arc<ConversationManager>,
}

impl ChatHandlers {
    pub fn new(manager: Arc<ConversationManager>) -> Self {
        Self { manager }
    }
}

/// POST /api/chat/message - Process one conversation turn.
pub async fn post_message(
    State(handlers): State<ChatHandlers>,
    Json(request): Json<ChatMessageRequest>,
) -> Response {
    let session_id = request
        .session_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    match handlers
        .manager
        .handle_message(&session_id, &request.message, request.source)
        .await
    {
        Ok(outcome) => {
            (StatusCode::OK, Json(ChatMessageResponse::from_outcome(outcome))).into_response()
        }
        Err(error) => handle_manager_error(error),
    }
}

/// GET /api/chat/sessions/:id - Inspect a conversation.
pub async fn get_session(
    State(handlers): State<ChatHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    match handlers.manager.get_session(&session_id).await {
        Ok(Some(session)) => {
            (StatusCode::OK, Json(SessionResponse::from(session))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("session not found")),
        )
            .into_response(),
        Err(error) => handle_manager_error(error),
    }
}

/// DELETE /api/chat/sessions/:id - End a conversation.
pub async fn delete_session(
    State(handlers): State<ChatHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    match handlers.manager.delete_session(&session_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("session not found")),
        )
            .into_response(),
        Err(error) => handle_manager_error(error),
    }
}

/// GET /health - Liveness probe.
pub async fn health() -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response()
}

fn handle_manager_error(error: ManagerError) -> Response {
    match error {
        ManagerError::EmptyMessage => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("message must not be empty")),
        )
            .into_response(),
        ManagerError::Store(e) => {
            tracing::error!(error = %e, "session store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal error")),
            )
                .into_response()
        }
    }
}
