//! Lightweight port fakes for service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::TimeDelta;
use uuid::Uuid;

use crate::domain::{FeedEvent, Post, User};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, FeedNotifier, ImageStore, PasswordService, PostRepository,
    StorageError, TokenClaims, TokenService, UserRepository,
};

#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
    fail_updates: AtomicBool,
}

impl MemoryUsers {
    /// Make every subsequent `update` fail like a dropped connection.
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.get(id))
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(RepoError::Connection("connection reset".to_string()));
        }
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(user)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

#[derive(Default)]
pub struct MemoryPosts {
    posts: Mutex<HashMap<Uuid, Post>>,
    page_queries: AtomicUsize,
}

impl MemoryPosts {
    pub fn get(&self, id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().get(&id).cloned()
    }

    /// How many times `find_page` ran.
    pub fn page_queries(&self) -> usize {
        self.page_queries.load(Ordering::SeqCst)
    }

    fn sorted(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.lock().unwrap().values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemoryPosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.get(id))
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        self.posts.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        match posts.get_mut(&post.id) {
            Some(slot) => {
                *slot = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for MemoryPosts {
    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.posts.lock().unwrap().len() as u64)
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        self.page_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .sorted()
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_creator(&self, creator_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|p| p.creator_id == creator_id)
            .collect())
    }

    async fn image_in_use(&self, image_url: &str) -> Result<bool, RepoError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .values()
            .any(|p| p.image_url == image_url))
    }
}

/// Reversible "hash" so tests stay fast.
pub struct PlainPasswords;

#[async_trait]
impl PasswordService for PlainPasswords {
    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("hashed:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Unsigned `user_id|email` tokens.
pub struct FakeTokens;

impl TokenService for FakeTokens {
    fn generate_token_with_ttl(
        &self,
        user_id: Uuid,
        email: &str,
        _ttl: TimeDelta,
    ) -> Result<String, AuthError> {
        Ok(format!("{user_id}|{email}"))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let (id, email) = token
            .split_once('|')
            .ok_or_else(|| AuthError::InvalidToken("malformed".to_string()))?;
        Ok(TokenClaims {
            user_id: Uuid::parse_str(id).map_err(|e| AuthError::InvalidToken(e.to_string()))?,
            email: email.to_string(),
            issued_at: 0,
            expires_at: i64::MAX,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        3600
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<FeedEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<FeedEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl FeedNotifier for RecordingNotifier {
    fn publish(&self, event: FeedEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Records which image URLs were removed. Every URL counts as stored until it
/// is removed or marked missing.
#[derive(Default)]
pub struct RecordingImages {
    removed: Mutex<Vec<String>>,
    missing: Mutex<HashSet<String>>,
}

impl RecordingImages {
    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }

    pub fn mark_missing(&self, image_url: &str) {
        self.missing.lock().unwrap().insert(image_url.to_string());
    }
}

#[async_trait]
impl ImageStore for RecordingImages {
    async fn store(&self, original_name: &str, _bytes: &[u8]) -> Result<String, StorageError> {
        Ok(format!("images/{original_name}"))
    }

    async fn exists(&self, image_url: &str) -> Result<bool, StorageError> {
        let gone = self.missing.lock().unwrap().contains(image_url)
            || self.removed.lock().unwrap().iter().any(|u| u == image_url);
        Ok(!gone)
    }

    async fn remove(&self, image_url: &str) -> Result<(), StorageError> {
        self.removed.lock().unwrap().push(image_url.to_string());
        Ok(())
    }
}
