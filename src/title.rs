//! Thread title inference from the first user message.

use chat_client::{ChatClient, ChatSendRequest};
use chat_protocol::ChatMessage;
use thread_store::DEFAULT_THREAD_TITLE;

pub const TITLE_SYSTEM_PROMPT: &str = "You are a titling assistant. Reply with only a short phrase (3-6 words) that summarizes the following user message. No quotes, no explanation, no punctuation at the end.";

const MAX_INPUT_CHARS: usize = 500;
const MAX_TITLE_CHARS: usize = 80;

/// A thread needs a title while it still carries the placeholder (or no
/// title at all).
#[must_use]
pub fn needs_title(title: &str) -> bool {
    let title = title.trim();
    title.is_empty() || title == DEFAULT_THREAD_TITLE
}

/// Ask the model for a short title. Every failure mode collapses to `None`;
/// title inference must never surface an error to the exchange.
pub async fn generate_title(
    client: &ChatClient,
    model_profile_id: &str,
    first_message: &str,
) -> Option<String> {
    let input: String = first_message.trim().chars().take(MAX_INPUT_CHARS).collect();
    let request = ChatSendRequest::new(
        model_profile_id,
        vec![
            ChatMessage::system(TITLE_SYSTEM_PROMPT),
            ChatMessage::user(input),
        ],
    );

    let completion = match client.send(&request).await {
        Ok(completion) => completion,
        Err(error) => {
            tracing::debug!(kind = error.kind.as_str(), "title inference failed");
            return None;
        }
    };

    let title: String = completion
        .content
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::needs_title;

    #[test]
    fn placeholder_and_blank_titles_need_inference() {
        assert!(needs_title(""));
        assert!(needs_title("   "));
        assert!(needs_title("New thread"));
        assert!(needs_title("  New thread  "));
    }

    #[test]
    fn real_titles_do_not() {
        assert!(!needs_title("Parser Bug Fix"));
        assert!(!needs_title("new thread"));
    }
}
