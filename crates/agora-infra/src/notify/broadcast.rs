//! In-process feed notifier.
//!
//! Works within a single process only. Subscribers that connect after an
//! event was published never see it.

use tokio::sync::broadcast;

use agora_core::domain::FeedEvent;
use agora_core::ports::FeedNotifier;

/// Fans feed events out over a tokio broadcast channel.
#[derive(Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<FeedEvent>,
}

impl BroadcastNotifier {
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self { sender }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(100)
    }
}

impl FeedNotifier for BroadcastNotifier {
    fn publish(&self, event: FeedEvent) {
        let action = event.action();
        // Ignore send errors (no subscribers)
        match self.sender.send(event) {
            Ok(receivers) => tracing::debug!(action, receivers, "Feed event published"),
            Err(_) => tracing::debug!(action, "No subscribers for feed event"),
        }
    }
}
