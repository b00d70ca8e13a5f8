//! Application error type mapping to HTTP status codes.
//!
//! Error bodies are `{"error": message}`. Upstream provider failures are
//! the exception: their status and body are passed through untouched.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use parley_types::error::{RelayError, SessionError, StoreError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Session-related errors.
    Session(SessionError),
    /// Document store errors outside of session operations.
    Store(StoreError),
    /// Completion relay errors.
    Relay(RelayError),
    /// Malformed request body.
    Validation(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError::Relay(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Relay(RelayError::Upstream { status, body }) => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                return (status, [(header::CONTENT_TYPE, "application/json")], body).into_response();
            }
            AppError::Relay(RelayError::BadRequest(msg)) | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Relay(RelayError::BadGateway(msg)) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Relay(RelayError::Transport(msg)) => {
                tracing::warn!(error = %msg, "Upstream unreachable");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Session(SessionError::NotFound) => {
                (StatusCode::NOT_FOUND, SessionError::NotFound.to_string())
            }
            AppError::Session(SessionError::Store(e)) | AppError::Store(e) => {
                tracing::error!(error = %e, "Document store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = AppError::from(SessionError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await, r#"{"error":"Session not found"}"#);
    }

    #[tokio::test]
    async fn test_upstream_passthrough() {
        let response = AppError::from(RelayError::Upstream {
            status: 429,
            body: "slow down".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_of(response).await, "slow down");
    }

    #[tokio::test]
    async fn test_relay_status_mapping() {
        let cases = [
            (RelayError::BadRequest("missing".into()), StatusCode::BAD_REQUEST),
            (RelayError::BadGateway("bad".into()), StatusCode::BAD_GATEWAY),
            (
                RelayError::Transport("refused".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_invalid_upstream_status_becomes_bad_gateway() {
        let response = AppError::from(RelayError::Upstream {
            status: 42,
            body: String::new(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
