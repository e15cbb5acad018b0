use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// Post entity - an entry in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    /// Owning user. Never changes after creation.
    pub creator_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(creator_id: Uuid, title: String, content: String, image_url: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            creator_id,
            title,
            content,
            image_url,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id
    }

    /// Replace the editable fields and bump `updated_at`.
    pub fn revise(&mut self, title: String, content: String, image_url: String) {
        self.title = title;
        self.content = content;
        self.image_url = image_url;
        self.updated_at = Utc::now();
    }
}

/// Denormalized view of a post's creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&User> for CreatorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// A post together with its creator, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetails {
    #[serde(flatten)]
    pub post: Post,
    /// `None` when the creator record could not be loaded.
    pub creator: Option<CreatorSummary>,
}

impl PostDetails {
    pub fn new(post: Post, creator: Option<CreatorSummary>) -> Self {
        Self { post, creator }
    }
}
