use std::time::Duration;

/// Transport configuration for chat completion requests.
///
/// No timeout is enforced unless one is configured; streamed responses can
/// legitimately stay open for a long time.
#[derive(Debug, Clone, Default)]
pub struct ChatClientConfig {
    /// Optional whole-request timeout.
    pub timeout: Option<Duration>,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
}

impl ChatClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
