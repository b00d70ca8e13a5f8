//! Completion relay request and diagnostic types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::Message;

/// Caller-supplied upstream settings.
///
/// Read from the `config` field of relay requests. Every field is optional;
/// the relay decides what is missing. `temperature` and `max_tokens` are
/// forwarded to the provider untouched, so they stay untyped.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelayConfig {
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<serde_json::Value>,
    pub max_tokens: Option<serde_json::Value>,
}

/// Body of `POST /api/debug` and `POST /api/test`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProbeRequest {
    pub config: Option<RelayConfig>,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub config: Option<RelayConfig>,
    /// Only an array is used as the conversation; anything else is ignored.
    pub messages: Option<serde_json::Value>,
    pub system_prompt: Option<String>,
}

impl ChatRequest {
    /// The caller's messages, empty unless `messages` is an array.
    pub fn conversation(&self) -> &[Message] {
        self.messages
            .as_ref()
            .and_then(|m| m.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Where the effective token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    /// Supplied in the request's `config.token`.
    Config,
    /// Process-wide fallback secret.
    Env,
    /// Neither was available.
    Missing,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Config => write!(f, "config"),
            TokenSource::Env => write!(f, "env"),
            TokenSource::Missing => write!(f, "missing"),
        }
    }
}

/// Result of `Diagnose`: what the relay would use, with the token masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub base_url: String,
    pub model: String,
    pub token_masked: String,
    pub token_length: usize,
    pub token_source: TokenSource,
}
