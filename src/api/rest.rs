//! REST API router and configuration.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::{
    ask_handler, health_handler, suggestions_handler, tables_handler, ApiState,
};
use crate::chat::ChatEngine;

/// REST API configuration.
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    /// Enable CORS.
    pub enable_cors: bool,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self { enable_cors: true }
    }
}

/// Create the REST API router.
///
/// Endpoints:
/// - POST /chat/ask          - Answer a natural language question
/// - GET  /chat/tables       - List available tables
/// - GET  /chat/suggestions  - Sample questions
/// - GET  /health            - Health check
pub fn create_rest_router(engine: Arc<ChatEngine>, config: &RestApiConfig) -> Router {
    let state = Arc::new(ApiState::new(engine));

    let router = Router::new()
        .route("/chat/ask", post(ask_handler))
        .route("/chat/tables", get(tables_handler))
        .route("/chat/suggestions", get(suggestions_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_origin(Any);

        router.layer(cors)
    } else {
        router
    }
}
