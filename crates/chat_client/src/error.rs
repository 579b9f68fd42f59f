use std::fmt;

use chat_protocol::ChatErrorKind;
use reqwest::StatusCode;
use serde::Deserialize;

/// Classified failure of one completion call. Every exit path of the pipeline
/// folds into one of these before it reaches a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    #[must_use]
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::ValidationError, message)
    }

    #[must_use]
    pub fn model_not_found(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::ModelNotFound, message)
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::NetworkError, message)
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for ChatError {}

impl From<reqwest::Error> for ChatError {
    fn from(error: reqwest::Error) -> Self {
        Self::network(error.to_string())
    }
}

/// Map the well-known auth/routing/throttle statuses. Returns `None` for
/// success and for statuses whose message needs a body read.
pub fn error_for_status(status: StatusCode) -> Option<ChatError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(ChatError::new(
            ChatErrorKind::InvalidApiKey,
            "Invalid or unauthorized API key",
        )),
        StatusCode::NOT_FOUND => Some(ChatError::model_not_found("Model or endpoint not found")),
        StatusCode::TOO_MANY_REQUESTS => Some(ChatError::new(
            ChatErrorKind::RateLimited,
            "Rate limited; try again later",
        )),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayloadFields {
    message: Option<String>,
}

/// Best-effort message for an unexpected non-2xx response: the server's
/// `{error:{message}}` field when the body parses, else a generic fallback.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload
            .error
            .and_then(|error| error.message)
            .filter(|message| !message.trim().is_empty())
        {
            return message;
        }
    }
    format!("Request failed: {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::{parse_error_message, ChatError};
    use chat_protocol::ChatErrorKind;
    use reqwest::StatusCode;

    #[test]
    fn display_includes_kind_and_message() {
        let error = ChatError::validation("messages must be a non-empty array");
        assert_eq!(
            error.to_string(),
            "VALIDATION_ERROR: messages must be a non-empty array"
        );
        assert_eq!(error.kind, ChatErrorKind::ValidationError);
    }

    #[test]
    fn error_message_falls_back_when_body_is_not_json() {
        assert_eq!(
            parse_error_message(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            "Request failed: 502"
        );
    }
}
