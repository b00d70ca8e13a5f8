//! Completion relay HTTP handlers.
//!
//! Endpoints:
//! - POST /api/debug - Show effective settings (token masked), no network
//! - POST /api/test  - Send a minimal probe to the configured provider
//! - POST /api/chat  - Relay a conversation to the configured provider

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use parley_types::relay::{ChatRequest, Diagnosis, ProbeRequest};

use crate::http::error::AppError;
use crate::http::extractors::lenient::LenientJson;
use crate::state::AppState;

/// POST /api/debug
pub async fn debug_config(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<ProbeRequest>,
) -> Json<Diagnosis> {
    Json(state.relay_service.diagnose(body.config.as_ref()))
}

/// POST /api/test
pub async fn test_connection(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<ProbeRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.relay_service.test(body.config.as_ref()).await?))
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.relay_service.send(&body).await?))
}
