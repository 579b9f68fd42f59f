use chat_protocol::ChatMessage;
use profile_store::ModelProfile;
use serde::Serialize;

use crate::error::ChatError;

/// Caller input for one completion call: which profile to use and the
/// conversation history to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSendRequest {
    pub model_profile_id: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatSendRequest {
    pub fn new(model_profile_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model_profile_id: model_profile_id.into(),
            messages,
        }
    }

    /// Reject malformed caller input before anything touches the network.
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.model_profile_id.trim().is_empty() {
            return Err(ChatError::validation("modelProfileId is required"));
        }
        if self.messages.is_empty() {
            return Err(ChatError::validation("messages must be a non-empty array"));
        }
        Ok(())
    }
}

/// Wire body for `POST {baseUrl}/chat/completions`. Messages are stripped to
/// role/content; sampling fields are omitted when the profile carries none.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

pub fn completion_body<'a>(
    profile: &'a ModelProfile,
    messages: &'a [ChatMessage],
    stream: bool,
) -> CompletionBody<'a> {
    CompletionBody {
        model: &profile.model_id,
        messages,
        temperature: profile.temperature,
        max_tokens: profile.max_tokens,
        stream,
    }
}
