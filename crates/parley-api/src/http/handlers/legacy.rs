//! Legacy flat message log handlers.
//!
//! Endpoints:
//! - GET  /api/messages - Read the legacy log
//! - POST /api/messages - Overwrite the legacy log (non-array bodies store `[]`)

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use parley_types::session::Message;

use crate::http::error::AppError;
use crate::http::extractors::lenient::LenientJson;
use crate::http::handlers::session::into_messages;
use crate::state::AppState;

/// GET /api/messages
pub async fn get_legacy_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<Message>>, AppError> {
    Ok(Json(state.session_service.legacy_messages().await?))
}

/// POST /api/messages
pub async fn replace_legacy_messages(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<Value>,
) -> Result<Json<Value>, AppError> {
    state
        .session_service
        .replace_legacy_messages(into_messages(body))
        .await?;
    Ok(Json(json!({ "ok": true })))
}
