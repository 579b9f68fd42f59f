//! Streaming chat completion pipeline for OpenAI-compatible endpoints.
//!
//! Invariant: every streaming exchange terminates with exactly one terminal
//! event (`done` or `error`), and the assistant reply is persisted before
//! `done` is delivered.
//!
//! # Public API Overview
//! - Drive a full exchange with [`ChatOrchestrator`]: persistence, title
//!   inference, suspend inhibition, and event delivery in one call.
//! - Receive output through an [`ExchangeSink`]; a closed sink drops
//!   delivery without interrupting the exchange.
//! - Talk to endpoints directly with [`ChatClient`] from `chat_client` when
//!   persistence is not wanted.
//! - Store threads and profiles with [`ThreadStore`] and `profile_store`.

pub mod exchange;
pub mod guard;
pub mod sink;
pub mod title;

pub use crate::exchange::{ChatOrchestrator, ExchangeOptions, ExchangeOutcome};
pub use crate::guard::{NoopInhibitor, SuspendGuard, SuspendInhibitor};
pub use crate::sink::{ExchangeSink, TitleUpdate};
pub use crate::title::{generate_title, needs_title, TITLE_SYSTEM_PROMPT};

/// Transport client and request types.
pub use chat_client::{ChatClient, ChatClientConfig, ChatCompletion, ChatError, ChatSendRequest};

/// Wire-level event and message vocabulary.
pub use chat_protocol::{ChatErrorKind, ChatMessage, ChatStreamEvent, Role, StreamPhase};

/// Thread persistence.
pub use thread_store::{Message, NewMessage, Thread, ThreadSnapshot, ThreadStore};
