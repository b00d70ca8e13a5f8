//! Server settings loaded from `parley.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Tunables read from `{data_dir}/parley.toml`.
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Request timeout for calls to the upstream provider, in seconds.
    pub upstream_timeout_secs: u64,
    /// Largest accepted request body, in bytes.
    pub body_limit_bytes: usize,
    /// Directory served as the static web UI, if it exists.
    pub web_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            upstream_timeout_secs: 120,
            body_limit_bytes: 2 * 1024 * 1024,
            web_dir: PathBuf::from("public"),
        }
    }
}
