//! Lenient JSON body extractor.
//!
//! Unlike `axum::Json`, a missing body, an empty body, a `null` body, or a
//! missing `Content-Type` all yield `T::default()`. Only syntactically
//! invalid JSON or a body of the wrong shape is rejected.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

use crate::http::error::AppError;

/// JSON body that defaults when absent.
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Over-limit bodies are rejected here with 413.
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Validation(format!("Invalid JSON body: {e}")).into_response()
        })?;
        if value.is_null() {
            return Ok(Self(T::default()));
        }

        serde_json::from_value(value).map(Self).map_err(|e| {
            AppError::Validation(format!("Unexpected request body: {e}")).into_response()
        })
    }
}
