//! Shared wire contract for the chat pipeline.
//!
//! Everything a transport, store, or presentation surface needs to agree on
//! lives here: message roles, the streaming lifecycle event union, and the
//! error taxonomy. This crate intentionally has no I/O.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "system" => Self::System,
            _ => return None,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// One turn in a conversation history, stripped to what the wire carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Coarse progress phase reported while a streamed response is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamPhase {
    Thinking,
    Writing,
}

/// Failure classification surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatErrorKind {
    ValidationError,
    ModelNotFound,
    InvalidApiKey,
    RateLimited,
    NetworkError,
}

impl ChatErrorKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ModelNotFound => "MODEL_NOT_FOUND",
            Self::InvalidApiKey => "INVALID_API_KEY",
            Self::RateLimited => "RATE_LIMITED",
            Self::NetworkError => "NETWORK_ERROR",
        }
    }
}

/// Lifecycle event emitted once per observable step of a streaming exchange.
///
/// A call emits at most one `start`, then interior events, and terminates in
/// exactly one of `done` or `error`; nothing is emitted after the terminal
/// event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    Start {
        status: StreamPhase,
    },
    Status {
        status: StreamPhase,
    },
    ToolStart {
        #[serde(rename = "toolName")]
        tool_name: String,
    },
    ToolEnd,
    Delta {
        chunk: String,
    },
    Reasoning {
        chunk: String,
    },
    ReasoningDone,
    Done {
        role: Role,
        content: String,
    },
    Error {
        kind: ChatErrorKind,
        message: String,
    },
}

impl ChatStreamEvent {
    /// Whether this event ends the stream.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatErrorKind, ChatStreamEvent, Role, StreamPhase};

    #[test]
    fn event_variant_names_stable() {
        let start = ChatStreamEvent::Start {
            status: StreamPhase::Thinking,
        };
        let start_json = serde_json::to_value(&start).expect("serialize start event");
        assert_eq!(start_json["type"], "start");
        assert_eq!(start_json["status"], "thinking");

        let delta = ChatStreamEvent::Delta {
            chunk: "hello".to_string(),
        };
        let delta_json = serde_json::to_value(&delta).expect("serialize delta event");
        assert_eq!(delta_json["type"], "delta");
        assert_eq!(delta_json["chunk"], "hello");

        let done = ChatStreamEvent::Done {
            role: Role::Assistant,
            content: "hello world".to_string(),
        };
        let done_json = serde_json::to_value(&done).expect("serialize done event");
        assert_eq!(done_json["type"], "done");
        assert_eq!(done_json["role"], "assistant");

        let error = ChatStreamEvent::Error {
            kind: ChatErrorKind::RateLimited,
            message: "slow down".to_string(),
        };
        let error_json = serde_json::to_value(&error).expect("serialize error event");
        assert_eq!(error_json["type"], "error");
        assert_eq!(error_json["kind"], "RATE_LIMITED");
    }

    #[test]
    fn tool_events_carry_camel_case_tool_name() {
        let event = ChatStreamEvent::ToolStart {
            tool_name: "search".to_string(),
        };
        let json = serde_json::to_value(&event).expect("serialize tool_start event");
        assert_eq!(json["type"], "tool_start");
        assert_eq!(json["toolName"], "search");
    }

    #[test]
    fn terminal_events_are_done_and_error_only() {
        assert!(ChatStreamEvent::Done {
            role: Role::Assistant,
            content: String::new(),
        }
        .is_terminal());
        assert!(ChatStreamEvent::Error {
            kind: ChatErrorKind::NetworkError,
            message: "boom".to_string(),
        }
        .is_terminal());
        assert!(!ChatStreamEvent::ReasoningDone.is_terminal());
        assert!(!ChatStreamEvent::Start {
            status: StreamPhase::Thinking,
        }
        .is_terminal());
    }

    #[test]
    fn role_round_trips_through_parse() {
        for role in [Role::User, Role::Assistant, Role::System] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("tool"), None);
    }
}
