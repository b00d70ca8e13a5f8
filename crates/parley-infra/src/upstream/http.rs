//! HttpUpstreamClient -- reqwest implementation of [`UpstreamClient`].
//!
//! The caller's token is wrapped in [`SecretString`] and only exposed when
//! building the `Authorization` header. It never appears in logs.

use std::time::Duration;

use parley_core::relay::{UpstreamClient, UpstreamReply};
use parley_types::error::RelayError;
use secrecy::{ExposeSecret, SecretString};

/// OpenAI-compatible chat-completion client over HTTP.
///
/// Every request carries the configured timeout. Dropping the returned
/// future cancels the in-flight request.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
}

impl HttpUpstreamClient {
    /// Build a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl UpstreamClient for HttpUpstreamClient {
    async fn post_chat_completion(
        &self,
        url: &str,
        token: &SecretString,
        body: &serde_json::Value,
    ) -> Result<UpstreamReply, RelayError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        tracing::debug!(status, bytes = body.len(), "Upstream replied");
        Ok(UpstreamReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client() -> HttpUpstreamClient {
        HttpUpstreamClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_posts_json_with_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"model": "m", "messages": []})))
            .with_status(200)
            .with_body(r#"{"id":"cmpl-1"}"#)
            .create_async()
            .await;

        let url = format!("{}/v1/chat/completions", server.url());
        let token = SecretString::from("sk-test".to_string());
        let reply = client()
            .post_chat_completion(&url, &token, &json!({"model": "m", "messages": []}))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, r#"{"id":"cmpl-1"}"#);
    }

    #[tokio::test]
    async fn test_error_status_is_a_reply_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let url = format!("{}/chat/completions", server.url());
        let token = SecretString::from("sk-test".to_string());
        let reply = client()
            .post_chat_completion(&url, &token, &json!({}))
            .await
            .unwrap();

        assert_eq!(reply.status, 429);
        assert_eq!(reply.body, "rate limited");
        assert!(!reply.is_success());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let token = SecretString::from("sk-test".to_string());
        let err = client()
            .post_chat_completion("http://127.0.0.1:1/chat/completions", &token, &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Transport(_)));
    }
}
