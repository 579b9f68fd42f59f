use std::fs;
use std::path::{Path, PathBuf};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ThreadStoreError;
use crate::schema::{
    Message, NewMessage, Thread, ThreadDocument, ThreadSnapshot, DEFAULT_THREAD_TITLE,
};

/// File name of the thread document inside the install's data directory.
pub const THREADS_FILE_NAME: &str = "boson-threads.json";

/// Longest title the store will persist; longer input is truncated.
pub const MAX_TITLE_CHARS: usize = 100;

/// Durable, append-only per-thread message log.
///
/// Every operation re-reads the document fresh and rewrites it whole, so no
/// partial write is ever observable to a subsequent read. There is no
/// cross-operation lock; concurrent callers must mutate disjoint fields.
#[derive(Debug, Clone)]
pub struct ThreadStore {
    path: PathBuf,
}

impl ThreadStore {
    /// Store backed by `{data_dir}/boson-threads.json`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(THREADS_FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty thread for a project. `title` falls back to
    /// [`DEFAULT_THREAD_TITLE`] when absent or blank.
    pub fn create(
        &self,
        project_id: &str,
        title: Option<&str>,
    ) -> Result<Thread, ThreadStoreError> {
        let mut document = self.read()?;
        let thread = Thread {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            title: title
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(DEFAULT_THREAD_TITLE)
                .to_string(),
            created_at: now_rfc3339()?,
            archived_at: None,
        };
        document.threads.push(thread.clone());
        document
            .messages_by_thread_id
            .insert(thread.id.clone(), Vec::new());
        self.write(&document)?;
        Ok(thread)
    }

    /// Thread with materialized messages, or `None` when unknown.
    pub fn get(&self, thread_id: &str) -> Result<Option<ThreadSnapshot>, ThreadStoreError> {
        let document = self.read()?;
        let Some(thread) = document
            .threads
            .iter()
            .find(|thread| thread.id == thread_id)
            .cloned()
        else {
            return Ok(None);
        };
        let messages = document
            .messages_by_thread_id
            .get(thread_id)
            .cloned()
            .unwrap_or_default();
        Ok(Some(ThreadSnapshot { thread, messages }))
    }

    /// Append a message, assigning an id when the caller supplied none.
    ///
    /// Returns `Ok(None)` without writing when the thread is unknown; callers
    /// must treat that as "thread not found" and skip downstream work.
    pub fn append_message(
        &self,
        thread_id: &str,
        message: NewMessage,
    ) -> Result<Option<Message>, ThreadStoreError> {
        let mut document = self.read()?;
        if !document.threads.iter().any(|thread| thread.id == thread_id) {
            return Ok(None);
        }
        let stored = Message {
            id: message.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            role: message.role,
            content: message.content,
        };
        document
            .messages_by_thread_id
            .entry(thread_id.to_string())
            .or_default()
            .push(stored.clone());
        self.write(&document)?;
        Ok(Some(stored))
    }

    /// Non-archived threads for a project, newest creation first.
    pub fn list(&self, project_id: &str) -> Result<Vec<Thread>, ThreadStoreError> {
        let document = self.read()?;
        let mut threads: Vec<Thread> = document
            .threads
            .into_iter()
            .filter(|thread| thread.project_id == project_id && !thread.is_archived())
            .collect();
        threads.sort_by_key(|thread| std::cmp::Reverse(parse_timestamp(&thread.created_at)));
        Ok(threads)
    }

    /// Archived threads for a project, most recently archived first.
    pub fn list_archived(&self, project_id: &str) -> Result<Vec<Thread>, ThreadStoreError> {
        let document = self.read()?;
        let mut threads: Vec<Thread> = document
            .threads
            .into_iter()
            .filter(|thread| thread.project_id == project_id && thread.is_archived())
            .collect();
        threads.sort_by_key(|thread| {
            std::cmp::Reverse(thread.archived_at.as_deref().map(parse_timestamp))
        });
        Ok(threads)
    }

    /// Archive a thread. Already-archived threads are left untouched (the
    /// original timestamp stands) and still report success.
    pub fn archive(&self, thread_id: &str) -> Result<bool, ThreadStoreError> {
        let mut document = self.read()?;
        let Some(thread) = document
            .threads
            .iter_mut()
            .find(|thread| thread.id == thread_id)
        else {
            return Ok(false);
        };
        if thread.archived_at.is_some() {
            return Ok(true);
        }
        thread.archived_at = Some(now_rfc3339()?);
        self.write(&document)?;
        Ok(true)
    }

    /// Unarchive a thread; a no-op success when it was never archived.
    pub fn unarchive(&self, thread_id: &str) -> Result<bool, ThreadStoreError> {
        let mut document = self.read()?;
        let Some(thread) = document
            .threads
            .iter_mut()
            .find(|thread| thread.id == thread_id)
        else {
            return Ok(false);
        };
        if thread.archived_at.is_none() {
            return Ok(true);
        }
        thread.archived_at = None;
        self.write(&document)?;
        Ok(true)
    }

    /// Set a thread's title. Reports `false` for an unknown thread or a title
    /// that is empty after trimming; longer titles are truncated to
    /// [`MAX_TITLE_CHARS`].
    pub fn update_title(&self, thread_id: &str, title: &str) -> Result<bool, ThreadStoreError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        let mut document = self.read()?;
        let Some(thread) = document
            .threads
            .iter_mut()
            .find(|thread| thread.id == thread_id)
        else {
            return Ok(false);
        };
        thread.title = trimmed.chars().take(MAX_TITLE_CHARS).collect();
        self.write(&document)?;
        Ok(true)
    }

    /// Load the full document; a missing file reads as empty collections.
    pub fn read(&self) -> Result<ThreadDocument, ThreadStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ThreadDocument::default());
            }
            Err(source) => {
                return Err(ThreadStoreError::io(
                    "reading thread document",
                    &self.path,
                    source,
                ));
            }
        };
        serde_json::from_str(&raw).map_err(|source| ThreadStoreError::parse(&self.path, source))
    }

    fn write(&self, document: &ThreadDocument) -> Result<(), ThreadStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| {
                ThreadStoreError::io("creating thread document directory", parent, source)
            })?;
        }
        let raw = serde_json::to_string(document)
            .map_err(|source| ThreadStoreError::serialize(&self.path, source))?;
        fs::write(&self.path, raw)
            .map_err(|source| ThreadStoreError::io("writing thread document", &self.path, source))
    }
}

fn now_rfc3339() -> Result<String, ThreadStoreError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(ThreadStoreError::ClockFormat)
}

fn parse_timestamp(value: &str) -> OffsetDateTime {
    OffsetDateTime::parse(value, &Rfc3339).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::parse_timestamp;
    use time::OffsetDateTime;

    #[test]
    fn unparseable_timestamps_sort_as_epoch() {
        assert_eq!(parse_timestamp("not-a-date"), OffsetDateTime::UNIX_EPOCH);
        assert!(parse_timestamp("2026-02-14T00:00:00Z") > OffsetDateTime::UNIX_EPOCH);
    }
}
