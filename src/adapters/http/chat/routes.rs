//! HTTP routes for the chat endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{delete_session, get_session, health, post_message, ChatHandlers};

/// Creates the chat router with all endpoints.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/api/chat/message", post(post_message))
        .route(
            "/api/chat/sessions/:id",
            get(get_session).delete(delete_session),
        )
        .route("/health", get(health))
        .with_state(handlers)
}
