//! System-suspend inhibition held for the lifetime of a streaming exchange.

use std::sync::Arc;

/// Host hook that keeps the machine awake while a completion streams.
///
/// `acquire` returns an opaque token that must be passed back to `release`.
/// Implementations are expected to tolerate release of an unknown token.
pub trait SuspendInhibitor: Send + Sync {
    fn acquire(&self) -> u64;
    fn release(&self, token: u64);
}

/// Inhibitor for hosts without a power-management facility.
#[derive(Debug, Default)]
pub struct NoopInhibitor;

impl SuspendInhibitor for NoopInhibitor {
    fn acquire(&self) -> u64 {
        0
    }

    fn release(&self, _token: u64) {}
}

/// RAII wrapper that releases its inhibition token on drop, on every exit
/// path of the exchange including panics and early errors.
pub struct SuspendGuard {
    inhibitor: Arc<dyn SuspendInhibitor>,
    token: Option<u64>,
}

impl SuspendGuard {
    /// Acquire inhibition when `enabled`; otherwise hold nothing.
    pub fn acquire(inhibitor: Arc<dyn SuspendInhibitor>, enabled: bool) -> Self {
        let token = enabled.then(|| inhibitor.acquire());
        Self { inhibitor, token }
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.token.is_some()
    }
}

impl Drop for SuspendGuard {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            self.inhibitor.release(token);
        }
    }
}
