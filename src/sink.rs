//! Delivery boundary between the pipeline and whatever renders it.

use chat_protocol::ChatStreamEvent;
use serde::{Deserialize, Serialize};

/// Notification that a thread's auto-inferred title was persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleUpdate {
    pub thread_id: String,
    pub title: String,
}

/// Consumer of exchange output. An `is_closed` sink stops receiving events
/// but never interrupts the exchange itself; persistence still completes.
pub trait ExchangeSink: Send + Sync {
    fn event(&self, event: ChatStreamEvent);

    fn title_updated(&self, update: TitleUpdate);

    fn is_closed(&self) -> bool {
        false
    }
}
