//! Client settings handlers.
//!
//! Endpoints:
//! - GET  /api/config - Read the stored config (`{}` when unset)
//! - POST /api/config - Overwrite the stored config verbatim

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::http::error::AppError;
use crate::http::extractors::lenient::LenientJson;
use crate::state::AppState;

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    Ok(Json(state.config_service.get_config().await?))
}

/// POST /api/config
pub async fn put_config(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<Value>,
) -> Result<Json<Value>, AppError> {
    let config = if body.is_null() { json!({}) } else { body };
    state.config_service.put_config(&config).await?;
    Ok(Json(json!({ "ok": true })))
}
