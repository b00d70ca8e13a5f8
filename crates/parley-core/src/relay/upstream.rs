//! Port to the upstream chat-completion provider.

use parley_types::error::RelayError;
use secrecy::SecretString;

/// Raw upstream response: status and body text, unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one chat-completion request to an OpenAI-compatible endpoint.
///
/// Implementations perform a single POST with a JSON body and a bearer
/// token and report the reply as-is. Connection and timeout failures map to
/// [`RelayError::Transport`]; non-success statuses are NOT errors at this
/// layer. No retries.
pub trait UpstreamClient: Send + Sync {
    fn post_chat_completion(
        &self,
        url: &str,
        token: &SecretString,
        body: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<UpstreamReply, RelayError>> + Send;
}
