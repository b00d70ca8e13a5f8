//! Session service owning session metadata and per-session conversations.
//!
//! Sessions and conversations live in two separate documents that this
//! service keeps in lockstep: a conversation exists for every live session
//! and is dropped exactly when its session is pruned. Each mutating
//! operation is a full read, an in-memory transform, and a full overwrite,
//! serialized by one guard per document. Guards are always taken in the
//! order sessions -> conversations -> legacy log.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parley_types::document::DocumentKey;
use parley_types::error::SessionError;
use parley_types::session::{
    Conversations, Message, Session, DEFAULT_SESSION_TITLE, MIGRATED_SESSION_TITLE,
};
use tokio::sync::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::storage::{load_or_default, save, DocumentStore};

/// Sessions whose recency timestamp is older than this are pruned on list.
pub const RETENTION_DAYS: i64 = 30;

/// One exclusive-access guard per persisted document.
#[derive(Debug, Default)]
struct DocumentGuards {
    sessions: Mutex<()>,
    conversations: Mutex<()>,
    legacy: Mutex<()>,
}

/// Orchestrates session lifecycle, retention pruning, and legacy migration.
///
/// Generic over `DocumentStore` to maintain clean architecture
/// (parley-core never depends on parley-infra).
pub struct SessionService<D: DocumentStore> {
    store: Arc<D>,
    guards: DocumentGuards,
}

impl<D: DocumentStore> SessionService<D> {
    /// Create a new session service over the given store.
    pub fn new(store: Arc<D>) -> Self {
        Self {
            store,
            guards: DocumentGuards::default(),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &D {
        &self.store
    }

    // --- Session lifecycle ---

    /// List live sessions, most recent first.
    ///
    /// Prunes sessions past the retention window and persists the result,
    /// then drops every conversation whose session is gone. Conversations
    /// are only rewritten when something was removed.
    pub async fn list(&self) -> Result<Vec<Session>, SessionError> {
        let _sessions_guard = self.guards.sessions.lock().await;
        let _conversations_guard = self.guards.conversations.lock().await;

        let now = Utc::now();
        let loaded = self.load_sessions().await?;
        let before = loaded.len();

        let mut sessions = prune_expired(loaded, now);
        // Stable: equal timestamps keep their stored order.
        sessions.sort_by(|a, b| b.recency().cmp(&a.recency()));
        save(&*self.store, DocumentKey::Sessions, &sessions).await?;

        let keep: HashSet<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        let mut conversations: Conversations =
            load_or_default(&*self.store, DocumentKey::Conversations).await?;
        let conversations_before = conversations.len();
        conversations.retain(|id, _| keep.contains(id.as_str()));

        if conversations.len() != conversations_before {
            save(&*self.store, DocumentKey::Conversations, &conversations).await?;
        }

        if sessions.len() != before || conversations.len() != conversations_before {
            info!(
                sessions_pruned = before - sessions.len(),
                conversations_dropped = conversations_before - conversations.len(),
                "Pruned expired sessions"
            );
        }

        Ok(sessions)
    }

    /// Create a session with an empty conversation.
    ///
    /// The new session goes to the front of the stored ordering. A missing
    /// or empty title falls back to the default title.
    pub async fn create(&self, title: Option<String>) -> Result<Session, SessionError> {
        let _sessions_guard = self.guards.sessions.lock().await;
        let _conversations_guard = self.guards.conversations.lock().await;

        let now = Utc::now();
        let loaded = self.load_sessions().await?;
        let mut sessions = prune_expired(loaded, now);

        let title = title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string());
        let session = Session::new(new_session_id(), title, now);

        sessions.insert(0, session.clone());
        save(&*self.store, DocumentKey::Sessions, &sessions).await?;

        let mut conversations: Conversations =
            load_or_default(&*self.store, DocumentKey::Conversations).await?;
        conversations.insert(session.id.clone(), Vec::new());
        save(&*self.store, DocumentKey::Conversations, &conversations).await?;

        info!(session_id = %session.id, "Session created");
        Ok(session)
    }

    /// Messages of a session, or an empty list if it has no conversation.
    pub async fn get_messages(&self, session_id: &str) -> Result<Vec<Message>, SessionError> {
        let _conversations_guard = self.guards.conversations.lock().await;

        let mut conversations: Conversations =
            load_or_default(&*self.store, DocumentKey::Conversations).await?;
        Ok(conversations.remove(session_id).unwrap_or_default())
    }

    /// Overwrite a session's conversation and bump its `updated_at`.
    ///
    /// Fails with `NotFound` before touching any document if the session
    /// does not exist.
    pub async fn replace_messages(
        &self,
        session_id: &str,
        messages: Vec<Message>,
    ) -> Result<(), SessionError> {
        let _sessions_guard = self.guards.sessions.lock().await;
        let _conversations_guard = self.guards.conversations.lock().await;

        let mut sessions = self.load_sessions().await?;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(SessionError::NotFound)?;

        let count = messages.len();
        let mut conversations: Conversations =
            load_or_default(&*self.store, DocumentKey::Conversations).await?;
        conversations.insert(session_id.to_string(), messages);
        save(&*self.store, DocumentKey::Conversations, &conversations).await?;

        session.touch(Utc::now());
        save(&*self.store, DocumentKey::Sessions, &sessions).await?;

        debug!(session_id = %session_id, messages = count, "Conversation replaced");
        Ok(())
    }

    /// Rename a session.
    ///
    /// The title is trimmed; a blank result leaves the session untouched
    /// and returns it as stored.
    pub async fn rename(&self, session_id: &str, title: &str) -> Result<Session, SessionError> {
        let _sessions_guard = self.guards.sessions.lock().await;

        let mut sessions = self.load_sessions().await?;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(SessionError::NotFound)?;

        let title = title.trim();
        if title.is_empty() {
            debug!(session_id = %session_id, "Ignoring blank rename");
            return Ok(session.clone());
        }

        session.title = title.to_string();
        session.touch(Utc::now());
        let renamed = session.clone();
        save(&*self.store, DocumentKey::Sessions, &sessions).await?;

        info!(session_id = %session_id, "Session renamed");
        Ok(renamed)
    }

    /// Decode the sessions document entry by entry.
    ///
    /// Entries that do not decode as a [`Session`] are skipped with a
    /// warning; the rest are kept.
    async fn load_sessions(&self) -> Result<Vec<Session>, SessionError> {
        let raw: Vec<Value> = load_or_default(&*self.store, DocumentKey::Sessions).await?;
        let sessions = raw
            .into_iter()
            .filter_map(|entry| {
                let id = entry.get("id").and_then(Value::as_str).map(str::to_owned);
                match serde_json::from_value::<Session>(entry) {
                    Ok(session) => Some(session),
                    Err(e) => {
                        warn!(
                            session_id = id.as_deref().unwrap_or("<none>"),
                            error = %e,
                            "Skipping malformed session entry"
                        );
                        None
                    }
                }
            })
            .collect();
        Ok(sessions)
    }

    // --- Legacy layout ---

    /// Wrap the legacy message log in a session, once.
    ///
    /// Runs only when there are no sessions at all and the legacy log is
    /// non-empty. Returns whether a session was synthesized.
    pub async fn migrate_legacy_if_needed(&self) -> Result<bool, SessionError> {
        let _sessions_guard = self.guards.sessions.lock().await;
        let _conversations_guard = self.guards.conversations.lock().await;
        let _legacy_guard = self.guards.legacy.lock().await;

        // Any entry at all, even an undecodable one, means sessions exist.
        let raw: Vec<Value> = load_or_default(&*self.store, DocumentKey::Sessions).await?;
        if !raw.is_empty() {
            return Ok(false);
        }

        let legacy: Vec<Message> =
            load_or_default(&*self.store, DocumentKey::LegacyMessages).await?;
        if legacy.is_empty() {
            return Ok(false);
        }

        let count = legacy.len();
        let session = Session::new(new_session_id(), MIGRATED_SESSION_TITLE, Utc::now());

        let mut conversations: Conversations =
            load_or_default(&*self.store, DocumentKey::Conversations).await?;
        conversations.insert(session.id.clone(), legacy);

        save(&*self.store, DocumentKey::Sessions, &[session.clone()]).await?;
        save(&*self.store, DocumentKey::Conversations, &conversations).await?;

        info!(session_id = %session.id, messages = count, "Migrated legacy message log");
        Ok(true)
    }

    /// The flat legacy message log.
    pub async fn legacy_messages(&self) -> Result<Vec<Message>, SessionError> {
        let _legacy_guard = self.guards.legacy.lock().await;
        Ok(load_or_default(&*self.store, DocumentKey::LegacyMessages).await?)
    }

    /// Overwrite the flat legacy message log.
    pub async fn replace_legacy_messages(&self, messages: Vec<Message>) -> Result<(), SessionError> {
        let _legacy_guard = self.guards.legacy.lock().await;
        save(&*self.store, DocumentKey::LegacyMessages, &messages).await?;
        Ok(())
    }
}

/// Drop sessions whose recency timestamp falls before the retention cutoff.
fn prune_expired(sessions: Vec<Session>, now: DateTime<Utc>) -> Vec<Session> {
    let cutoff = now - Duration::days(RETENTION_DAYS);
    sessions
        .into_iter()
        .filter(|s| s.recency() >= cutoff)
        .collect()
}

/// Time-ordered session id, e.g. `s_0192f3c4...`.
fn new_session_id() -> String {
    format!("s_{}", Uuid::now_v7().simple())
}
