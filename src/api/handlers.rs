//! REST API request handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::chat::{ChatEngine, ChatRequest};
use crate::error::{ChatError, ParleyError};
use crate::schema::query_suggestions;

/// Application state shared across handlers.
pub struct ApiState {
    /// Chat engine answering questions.
    pub engine: Arc<ChatEngine>,
}

impl ApiState {
    pub fn new(engine: Arc<ChatEngine>) -> Self {
        Self { engine }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// POST /chat/ask - Answer a natural language question.
pub async fn ask_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    match state.engine.ask(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(ParleyError::Chat(ChatError::EmptyQuestion)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message cannot be empty".to_string(),
                code: "empty_message".to_string(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Error processing question: {}", e),
                code: "query_failed".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /chat/tables - List available tables and their schemas.
pub async fn tables_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let catalog = state.engine.catalog();
    Json(json!({
        "tables": catalog.to_json(),
        "total_tables": catalog.all().len(),
    }))
}

/// GET /chat/suggestions - Sample questions users can ask.
pub async fn suggestions_handler() -> impl IntoResponse {
    Json(query_suggestions())
}

/// GET /health - Health check.
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
