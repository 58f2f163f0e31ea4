//! REST API server for the chatbot pipeline
//!
//! Thin HTTP binding of the exposed surface (`submit` / `reset` / `stats`)
//! for the external CLI/web front ends. Sessions are addressed by a stable
//! id derived from the caller-provided session string.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use crate::gateway::MarketDataGateway;
use crate::gemini::GeminiClient;
use crate::session::{ConversationSession, PipelineConfig};

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub session_id: String,
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

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    config: PipelineConfig,
    gateway: Arc<dyn MarketDataGateway>,
    llm: Option<Arc<GeminiClient>>,
    sessions: Arc<RwLock<HashMap<Uuid, ConversationSession>>>,
}

impl ApiState {
    pub fn new(
        config: PipelineConfig,
        gateway: Arc<dyn MarketDataGateway>,
        llm: Option<Arc<GeminiClient>>,
    ) -> Self {
        Self {
            config,
            gateway,
            llm,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn new_session(&self) -> ConversationSession {
        ConversationSession::new(self.config.clone(), self.gateway.clone(), self.llm.clone())
    }
}

/// =============================
/// Helpers — Stable Session Ids
/// =============================

fn stable_uuid_from_string(input: &str) -> Uuid {
    use sha2::{Digest, Sha256};

    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

fn resolve_session_id(value: Option<&str>) -> Uuid {
    match value {
        Some(v) if !v.trim().is_empty() => {
            Uuid::parse_str(v).unwrap_or_else(|_| stable_uuid_from_string(v))
        }
        _ => Uuid::new_v4(),
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat_handler(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Message must not be empty".into())),
        );
    }

    let session_id = resolve_session_id(req.session_id.as_deref());
    info!("Chat request for session {}", session_id);

    let mut sessions = state.sessions.write().await;
    let session = sessions
        .entry(session_id)
        .or_insert_with(|| state.new_session());

    let report = session.submit(&req.message).await;
    let stats = session.stats();

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "session_id": session_id.to_string(),
            "report": report,
            "stats": stats,
        }))),
    )
}

/// =============================
/// Reset Endpoint
/// =============================

async fn reset_handler(
    State(state): State<ApiState>,
    Json(req): Json<ResetRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let session_id = resolve_session_id(Some(&req.session_id));

    let mut sessions = state.sessions.write().await;
    match sessions.get_mut(&session_id) {
        Some(session) => {
            session.reset();
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "session_id": session_id.to_string(),
                    "reset": true,
                }))),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "Unknown session: {}",
                session_id
            ))),
        ),
    }
}

/// =============================
/// Stats Endpoint
/// =============================

async fn stats_handler(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    let session_id = resolve_session_id(Some(&session_id));

    let sessions = state.sessions.read().await;
    match sessions.get(&session_id) {
        Some(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "session_id": session_id.to_string(),
                "stats": session.stats(),
            }))),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "Unknown session: {}",
                session_id
            ))),
        ),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat_handler))
        .route("/api/reset", post(reset_handler))
        .route("/api/stats/:session_id", get(stats_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
