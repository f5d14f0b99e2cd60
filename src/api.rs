//! REST API server for the stock insights bot
//!
//! Exposes the chat bot over HTTP for a browser chat UI.

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use crate::conversational::ChatBot;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Either a transcript (last user turn is answered) or a bare message
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub chat_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub message: Option<String>,
}

impl ChatRequest {
    fn user_text(&self) -> Option<&str> {
        let not_blank = |text: &&str| !text.trim().is_empty();

        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .filter(not_blank)
            .or_else(|| self.message.as_deref().filter(not_blank))
    }
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub bot: Arc<ChatBot>,
}

/// =============================
/// Handlers
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn status_handler(State(state): State<ApiState>) -> Json<ApiResponse> {
    let status = state.bot.api_status().await;

    Json(ApiResponse::success(serde_json::json!({
        "status": status,
        "label": status.to_string(),
    })))
}

async fn chat_handler(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(text) = req.user_text() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("No user message found".into())),
        );
    };

    let request_id = Uuid::new_v4();
    info!(%request_id, chat_id = ?req.chat_id, "chat request");

    let reply = state.bot.respond(text).await;

    let mut data = serde_json::json!({
        "answer": reply.answer,
        "intent": reply.intent,
        "request_id": request_id.to_string(),
    });
    if let Some(chat_id) = &req.chat_id {
        data["chat_id"] = serde_json::json!(chat_id);
    }

    (StatusCode::OK, Json(ApiResponse::success(data)))
}

/// =============================
/// Router
/// =============================

pub fn create_router(bot: Arc<ChatBot>) -> Router {
    let state = ApiState { bot };

    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status_handler))
        .route("/api/chat", post(chat_handler))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    bot: Arc<ChatBot>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(bot);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
