use std::collections::BTreeMap;

use chat_protocol::Role;
use serde::{Deserialize, Serialize};

/// Title assigned to a thread until inference replaces it.
pub const DEFAULT_THREAD_TITLE: &str = "New thread";

/// One persisted conversation turn. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
}

/// Message content handed to [`crate::ThreadStore::append_message`]; the store
/// assigns an id when none is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub id: Option<String>,
    pub role: Role,
    pub content: String,
}

impl NewMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
        }
    }
}

/// Thread metadata. The message log lives beside it in the document, keyed by
/// thread id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub project_id: String,
    pub title: String,
    /// RFC3339 creation timestamp.
    pub created_at: String,
    /// RFC3339 archive timestamp; presence means archived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<String>,
}

impl Thread {
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}

/// Thread metadata together with its materialized message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSnapshot {
    pub thread: Thread,
    pub messages: Vec<Message>,
}

/// The whole durable surface: one document per install, rewritten on every
/// mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadDocument {
    #[serde(default)]
    pub threads: Vec<Thread>,
    #[serde(default)]
    pub messages_by_thread_id: BTreeMap<String, Vec<Message>>,
}
