use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status every account starts with.
pub const DEFAULT_STATUS: &str = "I am new!";

/// User entity - represents an account on the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub status: String,
    /// Back-references to the user's posts. `Post::creator_id` is authoritative.
    pub post_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID, default status and timestamps.
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            status: DEFAULT_STATUS.to_string(),
            post_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a post as belonging to this user. Adding an id twice is a no-op.
    pub fn add_post(&mut self, post_id: Uuid) {
        if !self.post_ids.contains(&post_id) {
            self.post_ids.push(post_id);
            self.updated_at = Utc::now();
        }
    }

    /// Drop a post reference. Returns whether the id was present.
    pub fn remove_post(&mut self, post_id: Uuid) -> bool {
        let before = self.post_ids.len();
        self.post_ids.retain(|id| *id != post_id);
        let removed = self.post_ids.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn set_status(&mut self, status: String) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Lower-cases and trims an email address so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
