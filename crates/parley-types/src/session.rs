//! Session and conversation types.
//!
//! A session is a named, timestamped handle over one conversation. The
//! conversation itself is an ordered list of opaque messages kept in a
//! separate document, keyed by session id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An opaque conversation message.
///
/// Usually `{role, content}`, but the store never looks inside.
pub type Message = serde_json::Value;

/// Map from session id to its ordered messages.
pub type Conversations = HashMap<String, Vec<Message>>;

/// Title given to sessions created without one.
pub const DEFAULT_SESSION_TITLE: &str = "新对话";

/// Title of the session synthesized from the legacy message log.
pub const MIGRATED_SESSION_TITLE: &str = "默认对话";

/// Session metadata as persisted in the sessions document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Absent in some hand-edited or legacy documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session stamped with `now` for both timestamps.
    pub fn new(id: impl Into<String>, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            created_at: now,
            updated_at: Some(now),
        }
    }

    /// Recency timestamp: `updated_at`, falling back to `created_at`.
    pub fn recency(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Record a mutation at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}
