//! Named documents persisted by the store.

use std::fmt;

use serde_json::Value;

/// One of the four independently durable documents.
///
/// Each document is always read in full and overwritten in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    /// Opaque upstream settings blob.
    Config,
    /// Array of session metadata.
    Sessions,
    /// Map from session id to message array.
    Conversations,
    /// Flat message array from the pre-session layout.
    LegacyMessages,
}

impl DocumentKey {
    /// All documents, in the order they are initialized.
    pub const ALL: [DocumentKey; 4] = [
        DocumentKey::Config,
        DocumentKey::LegacyMessages,
        DocumentKey::Sessions,
        DocumentKey::Conversations,
    ];

    /// File name used by file-backed stores.
    pub fn file_name(&self) -> &'static str {
        match self {
            DocumentKey::Config => "config.json",
            DocumentKey::Sessions => "sessions.json",
            DocumentKey::Conversations => "conversations.json",
            DocumentKey::LegacyMessages => "messages.json",
        }
    }

    /// The value a freshly initialized (or cleared) document holds.
    pub fn empty_value(&self) -> Value {
        match self {
            DocumentKey::Config | DocumentKey::Conversations => {
                Value::Object(serde_json::Map::new())
            }
            DocumentKey::Sessions | DocumentKey::LegacyMessages => Value::Array(Vec::new()),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKey::Config => write!(f, "config"),
            DocumentKey::Sessions => write!(f, "sessions"),
            DocumentKey::Conversations => write!(f, "conversations"),
            DocumentKey::LegacyMessages => write!(f, "legacy_messages"),
        }
    }
}
