//! Relay service: validate, forward, and interpret upstream replies.

use parley_types::error::RelayError;
use parley_types::relay::{ChatRequest, Diagnosis, RelayConfig};
use secrecy::SecretString;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::credentials::{Credentials, MISSING_CREDENTIALS};
use super::upstream::UpstreamClient;

const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_TOKENS: u64 = 1024;

/// Error text for a success reply that is not structured JSON.
pub const INVALID_UPSTREAM_JSON: &str = "Invalid JSON from upstream";

/// Forwards chat-completion requests to the caller's configured provider.
pub struct RelayService<U: UpstreamClient> {
    upstream: U,
    fallback_token: Option<SecretString>,
}

impl<U: UpstreamClient> RelayService<U> {
    /// `fallback_token` is used when a request carries no token of its own.
    pub fn new(upstream: U, fallback_token: Option<SecretString>) -> Self {
        Self {
            upstream,
            fallback_token,
        }
    }

    fn resolve(&self, config: Option<&RelayConfig>) -> Credentials {
        Credentials::resolve(config, self.fallback_token.as_ref())
    }

    /// Report the effective settings without contacting the provider.
    pub fn diagnose(&self, config: Option<&RelayConfig>) -> Diagnosis {
        let creds = self.resolve(config);
        Diagnosis {
            token_masked: creds.masked_token(),
            token_length: creds.token_length(),
            token_source: creds.source,
            base_url: creds.base_url,
            model: creds.model,
        }
    }

    /// Send a minimal probe completion to check the settings work.
    pub async fn test(&self, config: Option<&RelayConfig>) -> Result<Value, RelayError> {
        let creds = self.validated(config)?;
        let body = json!({
            "model": creds.model,
            "temperature": 0,
            "max_tokens": 64,
            "messages": [{"role": "user", "content": "ping"}],
        });
        self.forward(&creds, &body, "probe").await
    }

    /// Relay a conversation, prefixed by the system prompt when one is given.
    pub async fn send(&self, request: &ChatRequest) -> Result<Value, RelayError> {
        let config = request.config.as_ref();
        let creds = self.validated(config)?;

        let mut messages = Vec::with_capacity(request.conversation().len() + 1);
        if let Some(prompt) = request.system_prompt.as_deref().filter(|p| !p.is_empty()) {
            messages.push(json!({"role": "system", "content": prompt}));
        }
        messages.extend(request.conversation().iter().cloned());

        let body = json!({
            "model": creds.model,
            "temperature": non_null(config.and_then(|c| c.temperature.clone()))
                .unwrap_or_else(|| json!(DEFAULT_TEMPERATURE)),
            "max_tokens": non_null(config.and_then(|c| c.max_tokens.clone()))
                .unwrap_or_else(|| json!(DEFAULT_MAX_TOKENS)),
            "messages": messages,
        });
        self.forward(&creds, &body, "chat").await
    }

    fn validated(&self, config: Option<&RelayConfig>) -> Result<Credentials, RelayError> {
        let creds = self.resolve(config);
        if !creds.is_complete() {
            debug!(token_source = %creds.source, "Rejecting relay request with missing credentials");
            return Err(RelayError::BadRequest(MISSING_CREDENTIALS.to_string()));
        }
        Ok(creds)
    }

    async fn forward(
        &self,
        creds: &Credentials,
        body: &Value,
        kind: &'static str,
    ) -> Result<Value, RelayError> {
        let url = creds.completions_url();
        debug!(kind, url = %url, model = %creds.model, "Forwarding completion request");

        let reply = self
            .upstream
            .post_chat_completion(&url, &creds.token, body)
            .await?;

        if !reply.is_success() {
            warn!(
                kind,
                status = reply.status,
                token = %creds.masked_token(),
                "Upstream returned an error"
            );
            return Err(RelayError::Upstream {
                status: reply.status,
                body: reply.body,
            });
        }

        parse_structured(&reply.body)
            .ok_or_else(|| RelayError::BadGateway(INVALID_UPSTREAM_JSON.to_string()))
    }
}

/// Parse a reply body, accepting only JSON objects and arrays.
fn parse_structured(body: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

fn non_null(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::upstream::UpstreamReply;
    use parley_types::relay::TokenSource;
    use secrecy::ExposeSecret;
    use std::sync::Mutex;

    /// Records every call and answers with a canned reply.
    struct MockUpstream {
        reply: Result<UpstreamReply, String>,
        calls: Mutex<Vec<(String, String, Value)>>,
    }

    impl MockUpstream {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(UpstreamReply {
                    status,
                    body: body.to_string(),
                }),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn unreachable(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl UpstreamClient for MockUpstream {
        async fn post_chat_completion(
            &self,
            url: &str,
            token: &SecretString,
            body: &Value,
        ) -> Result<UpstreamReply, RelayError> {
            self.calls.lock().unwrap().push((
                url.to_string(),
                token.expose_secret().to_string(),
                body.clone(),
            ));
            self.reply.clone().map_err(RelayError::Transport)
        }
    }

    fn config(token: Option<&str>) -> RelayConfig {
        RelayConfig {
            token: token.map(str::to_string),
            base_url: Some("https://x.com/v1/chat/completions/".to_string()),
            model: Some("qwen-plus".to_string()),
            ..Default::default()
        }
    }

    fn relay(upstream: MockUpstream, fallback: Option<&str>) -> RelayService<MockUpstream> {
        RelayService::new(upstream, fallback.map(|t| SecretString::from(t.to_string())))
    }

    #[test]
    fn test_diagnose_never_exposes_token() {
        let svc = relay(MockUpstream::replying(200, "{}"), Some("sk-envtoken-1234"));

        let diag = svc.diagnose(Some(&config(None)));
        assert_eq!(diag.token_source, TokenSource::Env);
        assert_eq!(diag.token_masked, "sk-e***1234");
        assert_eq!(diag.token_length, 16);
        assert_eq!(diag.base_url, "https://x.com/v1");
        assert_eq!(diag.model, "qwen-plus");

        let json = serde_json::to_string(&diag).unwrap();
        assert!(!json.contains("sk-envtoken-1234"));
    }

    #[test]
    fn test_diagnose_without_config() {
        let svc = relay(MockUpstream::replying(200, "{}"), None);
        let diag = svc.diagnose(None);
        assert_eq!(diag.token_source, TokenSource::Missing);
        assert_eq!(diag.base_url, "");
        assert_eq!(diag.token_masked, "");
    }

    #[tokio::test]
    async fn test_missing_token_is_bad_request_before_network() {
        let upstream = MockUpstream::replying(200, "{}");
        let svc = relay(upstream, None);

        let err = svc.test(Some(&config(None))).await.unwrap_err();
        assert!(matches!(err, RelayError::BadRequest(ref m) if m == MISSING_CREDENTIALS));

        let err = svc.send(&ChatRequest::default()).await.unwrap_err();
        assert!(matches!(err, RelayError::BadRequest(_)));
        assert!(svc.upstream.calls().is_empty());
    }

    #[tokio::test]
    async fn test_probe_body_and_endpoint() {
        let svc = relay(MockUpstream::replying(200, r#"{"id":"cmpl-1"}"#), None);

        let data = svc.test(Some(&config(Some("sk-config")))).await.unwrap();
        assert_eq!(data, json!({"id": "cmpl-1"}));

        let calls = svc.upstream.calls();
        assert_eq!(calls.len(), 1);
        let (url, token, body) = &calls[0];
        assert_eq!(url, "https://x.com/v1/chat/completions");
        assert_eq!(token, "sk-config");
        assert_eq!(
            body,
            &json!({
                "model": "qwen-plus",
                "temperature": 0,
                "max_tokens": 64,
                "messages": [{"role": "user", "content": "ping"}],
            })
        );
    }

    #[tokio::test]
    async fn test_send_prepends_system_prompt_and_applies_defaults() {
        let svc = relay(MockUpstream::replying(200, r#"{"choices":[]}"#), Some("sk-env"));
        let request = ChatRequest {
            config: Some(config(None)),
            messages: Some(json!([{"role": "user", "content": "hi"}])),
            system_prompt: Some("be brief".to_string()),
        };

        svc.send(&request).await.unwrap();

        let (_, token, body) = svc.upstream.calls().remove(0);
        assert_eq!(token, "sk-env");
        assert_eq!(body["temperature"], json!(0.7));
        assert_eq!(body["max_tokens"], json!(1024));
        assert_eq!(
            body["messages"],
            json!([
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hi"}
            ])
        );
    }

    #[tokio::test]
    async fn test_send_forwards_caller_parameters() {
        let svc = relay(MockUpstream::replying(200, "{}"), None);
        let mut cfg = config(Some("sk-config"));
        cfg.temperature = Some(json!(0.2));
        cfg.max_tokens = Some(json!(256));
        let request = ChatRequest {
            config: Some(cfg),
            messages: None,
            system_prompt: Some(String::new()),
        };

        svc.send(&request).await.unwrap();

        let (_, _, body) = svc.upstream.calls().remove(0);
        assert_eq!(body["temperature"], json!(0.2));
        assert_eq!(body["max_tokens"], json!(256));
        assert_eq!(body["messages"], json!([]));
    }

    #[tokio::test]
    async fn test_upstream_error_passes_through() {
        let svc = relay(
            MockUpstream::replying(401, r#"{"error":{"message":"bad key"}}"#),
            None,
        );

        let err = svc.test(Some(&config(Some("sk-config")))).await.unwrap_err();
        match err {
            RelayError::Upstream { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, r#"{"error":{"message":"bad key"}}"#);
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_success_is_bad_gateway() {
        for body in ["<html>oops</html>", "null", "", "42"] {
            let svc = relay(MockUpstream::replying(200, body), None);
            let err = svc.test(Some(&config(Some("sk-config")))).await.unwrap_err();
            assert!(
                matches!(err, RelayError::BadGateway(ref m) if m == INVALID_UPSTREAM_JSON),
                "body {body:?} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let svc = relay(MockUpstream::unreachable("connection refused"), None);
        let err = svc.test(Some(&config(Some("sk-config")))).await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(ref m) if m == "connection refused"));
    }
}
