//! Credential resolution for the relay.
//!
//! The effective token is the request's `config.token` when non-empty,
//! otherwise the process-wide fallback secret. Tokens stay wrapped in
//! [`SecretString`] and only leave it to build the bearer header or to be
//! masked for display.

use parley_types::relay::{RelayConfig, TokenSource};
use secrecy::{ExposeSecret, SecretString};

/// Error text for a request missing base address, model, or token.
pub const MISSING_CREDENTIALS: &str = "Missing baseUrl/model/token (or DASHSCOPE_API_KEY)";

const COMPLETIONS_SUFFIX: &str = "/chat/completions";

/// Canonical base address: no surrounding whitespace, no completions
/// suffix, no trailing slash.
///
/// A trailing slash is tolerated after the suffix too, so
/// `https://x.com/v1/chat/completions/` becomes `https://x.com/v1`.
pub fn normalize_base_url(input: &str) -> String {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(COMPLETIONS_SUFFIX).unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Short display form of a token, safe for logs and responses.
///
/// Counts characters rather than bytes so multibyte input never splits.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let (head, tail) = match chars.len() {
        0 => return String::new(),
        n if n <= 8 => (2.min(n), 1),
        _ => (4, 4),
    };
    let head: String = chars[..head].iter().collect();
    let tail: String = chars[chars.len() - tail..].iter().collect();
    format!("{head}***{tail}")
}

/// Upstream settings after applying fallbacks and normalization.
#[derive(Debug)]
pub struct Credentials {
    pub base_url: String,
    pub model: String,
    pub token: SecretString,
    pub source: TokenSource,
}

impl Credentials {
    /// Resolve effective settings from a request config and the fallback
    /// secret.
    pub fn resolve(config: Option<&RelayConfig>, fallback: Option<&SecretString>) -> Self {
        let from_config = config
            .and_then(|c| c.token.as_deref())
            .filter(|t| !t.is_empty());
        let from_env = fallback
            .map(|s| s.expose_secret())
            .filter(|t| !t.is_empty());

        let (token, source) = match (from_config, from_env) {
            (Some(t), _) => (t, TokenSource::Config),
            (None, Some(t)) => (t, TokenSource::Env),
            (None, None) => ("", TokenSource::Missing),
        };

        Self {
            base_url: normalize_base_url(config.and_then(|c| c.base_url.as_deref()).unwrap_or("")),
            model: config
                .and_then(|c| c.model.clone())
                .unwrap_or_default(),
            token: SecretString::from(token.to_owned()),
            source,
        }
    }

    /// True when base address, model, and token are all non-empty.
    pub fn is_complete(&self) -> bool {
        !self.base_url.is_empty() && !self.model.is_empty() && !self.token.expose_secret().is_empty()
    }

    pub fn masked_token(&self) -> String {
        mask_token(self.token.expose_secret())
    }

    /// Token length in characters.
    pub fn token_length(&self) -> usize {
        self.token.expose_secret().chars().count()
    }

    /// Full completions endpoint for the resolved base address.
    pub fn completions_url(&self) -> String {
        format!("{}{COMPLETIONS_SUFFIX}", self.base_url)
    }
}
