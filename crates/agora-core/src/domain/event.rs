use serde::Serialize;
use uuid::Uuid;

use super::PostDetails;

/// Feed mutation pushed to realtime clients.
///
/// Serializes as `{"action": "create" | "update", "post": {...}}` or
/// `{"action": "delete", "postId": "..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum FeedEvent {
    Create {
        post: PostDetails,
    },
    Update {
        post: PostDetails,
    },
    Delete {
        #[serde(rename = "postId")]
        post_id: Uuid,
    },
}

impl FeedEvent {
    pub fn action(&self) -> &'static str {
        match self {
            FeedEvent::Create { .. } => "create",
            FeedEvent::Update { .. } => "update",
            FeedEvent::Delete { .. } => "delete",
        }
    }
}
