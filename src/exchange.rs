//! Streaming exchange orchestration: persistence, title inference, and
//! event delivery around one completion call.

use std::sync::Arc;

use chat_client::{ChatClient, ChatCompletion, ChatError, ChatSendRequest};
use chat_protocol::{ChatStreamEvent, Role};
use thread_store::{NewMessage, ThreadStore, ThreadStoreError};
use tokio::task::JoinHandle;

use crate::guard::{SuspendGuard, SuspendInhibitor};
use crate::sink::{ExchangeSink, TitleUpdate};
use crate::title;

/// Per-exchange knobs. Sleep inhibition defaults on; hosts running on mains
/// power or in tests turn it off.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeOptions {
    pub prevent_sleep: bool,
}

impl Default for ExchangeOptions {
    fn default() -> Self {
        Self {
            prevent_sleep: true,
        }
    }
}

/// What an exchange left running when its event stream finished.
///
/// `title_task` is the still-in-flight title inference, if one was started.
/// Callers that need deterministic shutdown await it; dropping it lets the
/// task finish on its own.
pub struct ExchangeOutcome {
    pub title_task: Option<JoinHandle<()>>,
}

/// Drives one user/assistant exchange end to end: holds the suspend guard,
/// persists both sides of the conversation, runs title inference alongside
/// the stream, and forwards events to the sink while it is alive.
pub struct ChatOrchestrator {
    client: Arc<ChatClient>,
    threads: Arc<ThreadStore>,
    inhibitor: Arc<dyn SuspendInhibitor>,
}

impl ChatOrchestrator {
    pub fn new(
        client: Arc<ChatClient>,
        threads: Arc<ThreadStore>,
        inhibitor: Arc<dyn SuspendInhibitor>,
    ) -> Self {
        Self {
            client,
            threads,
            inhibitor,
        }
    }

    /// Stream one completion into `sink`, persisting the trailing user
    /// message first and the assistant reply on `done`.
    ///
    /// Persistence of the assistant reply is gated on the user message
    /// having been appended: an unknown `thread_id`, or a history that does
    /// not end in a user turn, streams with events flowing but persists
    /// nothing and infers no title. A closed sink likewise drops delivery
    /// without interrupting the network read or persistence.
    pub async fn stream(
        &self,
        thread_id: &str,
        request: &ChatSendRequest,
        sink: Arc<dyn ExchangeSink>,
        options: ExchangeOptions,
    ) -> Result<ExchangeOutcome, ThreadStoreError> {
        let _guard = SuspendGuard::acquire(self.inhibitor.clone(), options.prevent_sleep);

        let mut user_appended = false;
        let mut user_content = String::new();
        if let Some(message) = request
            .messages
            .last()
            .filter(|message| message.role == Role::User)
        {
            user_appended = self
                .threads
                .append_message(thread_id, NewMessage::new(Role::User, &message.content))?
                .is_some();
            user_content = message.content.clone();
            if !user_appended {
                tracing::debug!(thread_id, "streaming without persistence; thread unknown");
            }
        }

        let title_task = if user_appended {
            self.spawn_title_task(thread_id, request, &user_content, &sink)?
        } else {
            None
        };

        let mut store_fault: Option<ThreadStoreError> = None;
        self.client
            .stream_with_events(request, |event| {
                if let ChatStreamEvent::Done { role, content } = &event {
                    if user_appended {
                        match self
                            .threads
                            .append_message(thread_id, NewMessage::new(*role, content))
                        {
                            Ok(_) => {}
                            Err(error) => {
                                user_appended = false;
                                store_fault = Some(error);
                            }
                        }
                    }
                }
                if !sink.is_closed() {
                    sink.event(event);
                }
            })
            .await;

        match store_fault {
            Some(error) => Err(error),
            None => Ok(ExchangeOutcome { title_task }),
        }
    }

    /// One-shot completion under the same suspend guard, with no
    /// persistence. Used for utility calls that share the pipeline.
    pub async fn send(
        &self,
        request: &ChatSendRequest,
        options: ExchangeOptions,
    ) -> Result<ChatCompletion, ChatError> {
        let _guard = SuspendGuard::acquire(self.inhibitor.clone(), options.prevent_sleep);
        self.client.send(request).await
    }

    // Title inference runs concurrently with the stream. It fires only on
    // the first real user message of a placeholder-titled thread, and a
    // failed inference leaves the placeholder in place.
    fn spawn_title_task(
        &self,
        thread_id: &str,
        request: &ChatSendRequest,
        user_content: &str,
        sink: &Arc<dyn ExchangeSink>,
    ) -> Result<Option<JoinHandle<()>>, ThreadStoreError> {
        if user_content.trim().is_empty() || request.model_profile_id.trim().is_empty() {
            return Ok(None);
        }
        let Some(snapshot) = self.threads.get(thread_id)? else {
            return Ok(None);
        };
        if !title::needs_title(&snapshot.thread.title) {
            return Ok(None);
        }

        let client = Arc::clone(&self.client);
        let threads = Arc::clone(&self.threads);
        let sink = Arc::clone(sink);
        let thread_id = thread_id.to_string();
        let model_profile_id = request.model_profile_id.clone();
        let content = user_content.to_string();

        Ok(Some(tokio::spawn(async move {
            let Some(title) = title::generate_title(&client, &model_profile_id, &content).await
            else {
                return;
            };
            match threads.update_title(&thread_id, &title) {
                Ok(true) => {
                    if !sink.is_closed() {
                        sink.title_updated(TitleUpdate { thread_id, title });
                    }
                }
                Ok(false) => {}
                Err(error) => {
                    tracing::warn!(error = %error, "failed to persist inferred title");
                }
            }
        })))
    }
}
