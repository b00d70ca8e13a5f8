use thiserror::Error;

use crate::document::DocumentKey;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {key}: {source}")]
    Io {
        key: DocumentKey,
        #[source]
        source: std::io::Error,
    },

    #[error("document {key} is not valid JSON: {message}")]
    Corrupt { key: DocumentKey, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Other(String),
}

/// Errors related to session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the completion relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Required credentials or parameters are missing.
    #[error("{0}")]
    BadRequest(String),

    /// Non-success response from the provider, passed through untouched.
    #[error("upstream returned HTTP {status}")]
    Upstream { status: u16, body: String },

    /// Success status whose body is not structured data.
    #[error("{0}")]
    BadGateway(String),

    /// The provider could not be reached.
    #[error("{0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_display() {
        assert_eq!(SessionError::NotFound.to_string(), "Session not found");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Corrupt {
            key: DocumentKey::Sessions,
            message: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "document sessions is not valid JSON: expected value"
        );
    }

    #[test]
    fn test_upstream_error_keeps_body_out_of_display() {
        let err = RelayError::Upstream {
            status: 401,
            body: r#"{"error":"bad key sk-secret"}"#.to_string(),
        };
        assert_eq!(err.to_string(), "upstream returned HTTP 401");
    }
}
