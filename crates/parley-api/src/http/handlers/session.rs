//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/sessions               - List live sessions (prunes expired ones)
//! - POST /api/sessions               - Create a session
//! - PUT  /api/sessions/{id}          - Rename a session
//! - GET  /api/sessions/{id}/messages - Get a session's messages
//! - POST /api/sessions/{id}/messages - Replace a session's messages

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use parley_types::session::{Message, Session};

use crate::http::error::AppError;
use crate::http::extractors::lenient::LenientJson;
use crate::state::AppState;

/// Request body for creating a session.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSessionRequest {
    pub title: Option<String>,
}

/// Request body for renaming a session.
///
/// `title` is coerced to text: strings as-is, numbers and `true` in their
/// JSON form. Falsy values (`0`, `false`, `null`) and arrays or objects
/// become empty, which leaves the session unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenameSessionRequest {
    pub title: Option<Value>,
}

impl RenameSessionRequest {
    pub fn title_text(&self) -> String {
        match &self.title {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
            Some(Value::Bool(true)) => "true".to_string(),
            _ => String::new(),
        }
    }
}

/// GET /api/sessions
pub async fn list_sessions(State(state): State<AppState>) -> Result<Json<Vec<Session>>, AppError> {
    Ok(Json(state.session_service.list().await?))
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<CreateSessionRequest>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.session_service.create(body.title).await?))
}

/// PUT /api/sessions/{id}
pub async fn rename_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    LenientJson(body): LenientJson<RenameSessionRequest>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.session_service.rename(&id, &body.title_text()).await?))
}

/// GET /api/sessions/{id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    Ok(Json(state.session_service.get_messages(&id).await?))
}

/// POST /api/sessions/{id}/messages
///
/// A body that is not an array replaces the conversation with `[]`.
pub async fn replace_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
    LenientJson(body): LenientJson<Value>,
) -> Result<Json<Value>, AppError> {
    state
        .session_service
        .replace_messages(&id, into_messages(body))
        .await?;
    Ok(Json(json!({ "ok": true })))
}

/// Array bodies become message lists; anything else is empty.
pub(crate) fn into_messages(body: Value) -> Vec<Message> {
    match body {
        Value::Array(messages) => messages,
        _ => Vec::new(),
    }
}
