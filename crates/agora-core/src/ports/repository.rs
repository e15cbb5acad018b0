use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with [`RepoError::NotFound`] if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their (already normalized) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Load several users at once. Missing ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Total number of posts.
    async fn count(&self) -> Result<u64, RepoError>;

    /// Posts ordered by `created_at` descending (ties by id descending),
    /// skipping `offset` and returning at most `limit`.
    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// All posts of one creator, newest first.
    async fn find_by_creator(&self, creator_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Whether any post references `image_url`.
    async fn image_in_use(&self, image_url: &str) -> Result<bool, RepoError>;
}
