/// Normalize a base URL to the chat completions route.
///
/// Trailing slashes are stripped so configured bases like
/// `https://api.openai.com/v1/` and `https://api.openai.com/v1` produce the
/// same request URL.
pub fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Normalize a base URL to the model listing route.
pub fn models_url(base_url: &str) -> String {
    format!("{}/models", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::{chat_completions_url, models_url};

    #[test]
    fn trailing_slashes_are_stripped() {
        assert_eq!(
            chat_completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_completions_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            models_url("http://localhost:4000//"),
            "http://localhost:4000/models"
        );
    }
}
