//! Transport-only chat completion client primitives.
//!
//! This crate owns request building, response status mapping, and SSE stream
//! decoding for OpenAI-compatible endpoints. Profile resolution and secret
//! lookup are injected through the `profile_store` traits; thread persistence
//! and orchestration live elsewhere.

pub mod client;
pub mod config;
pub mod error;
pub mod model_list;
pub mod payload;
pub mod sse;
pub mod url;

pub use client::{ChatClient, ChatCompletion};
pub use config::ChatClientConfig;
pub use error::ChatError;
pub use model_list::{normalize_model_list, ModelEntry};
pub use payload::ChatSendRequest;
pub use sse::{SseLineDecoder, StreamDelta};
pub use url::{chat_completions_url, models_url};
