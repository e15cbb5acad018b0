//! Realtime notification port.

use crate::domain::FeedEvent;

/// Fans feed mutations out to connected realtime clients.
///
/// `publish` is fire-and-forget: it must return immediately and never fail
/// the request that triggered it. There is no replay for late subscribers.
pub trait FeedNotifier: Send + Sync {
    fn publish(&self, event: FeedEvent);
}
