//! Post feed: pagination, ownership-checked mutations and change broadcast.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{CreatorSummary, FeedEvent, Page, PageRequest, Post, PostDetails};
use crate::error::{DomainError, RepoError};
use crate::ports::{FeedNotifier, ImageStore, PostRepository, UserRepository};
use crate::validation::{MIN_TEXT_LEN, Validator};

/// Editable post fields as submitted by a client.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    /// URL of an uploaded image, or the previously stored one on update.
    pub image_url: Option<String>,
}

/// Feed operations.
///
/// Post and owner updates are two separate writes with no transaction around
/// them: if the second write fails the post exists without its back-reference
/// on the user.
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStore>,
    notifier: Arc<dyn FeedNotifier>,
    page_size: u64,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        images: Arc<dyn ImageStore>,
        notifier: Arc<dyn FeedNotifier>,
        page_size: u64,
    ) -> Self {
        Self {
            posts,
            users,
            images,
            notifier,
            page_size: page_size.max(1),
        }
    }

    /// Newest posts first. Out-of-range pages are empty, not errors.
    pub async fn list_posts(&self, page: Option<i64>) -> Result<Page<PostDetails>, DomainError> {
        let request = PageRequest::new(page, self.page_size);

        let total_items = self.posts.count().await?;
        if request.offset() >= total_items {
            return Ok(Page {
                items: Vec::new(),
                total_items,
            });
        }

        let posts = self
            .posts
            .find_page(request.offset(), request.limit())
            .await?;

        Ok(Page {
            items: self.with_creators(posts).await?,
            total_items,
        })
    }

    pub async fn create_post(
        &self,
        user_id: Uuid,
        input: PostInput,
    ) -> Result<PostDetails, DomainError> {
        let (title, content, image_url) = validate(input)?;
        self.check_image_available(&image_url).await?;

        let mut creator = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::AuthenticationRequired)?;

        let post = self
            .posts
            .create(Post::new(user_id, title, content, image_url))
            .await?;

        creator.add_post(post.id);
        let creator = self.users.update(creator).await?;

        tracing::info!(post_id = %post.id, user_id = %user_id, "Post created");

        let details = PostDetails::new(post, Some(CreatorSummary::from(&creator)));
        self.notifier.publish(FeedEvent::Create {
            post: details.clone(),
        });
        Ok(details)
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostDetails, DomainError> {
        let post = self.find(post_id).await?;
        self.with_creator(post).await
    }

    pub async fn update_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        input: PostInput,
    ) -> Result<PostDetails, DomainError> {
        let (title, content, image_url) = validate(input)?;

        let mut post = self.find(post_id).await?;
        if !post.is_owned_by(user_id) {
            return Err(DomainError::Forbidden);
        }

        let replaced_image = (post.image_url != image_url).then(|| post.image_url.clone());
        if replaced_image.is_some() {
            self.check_image_available(&image_url).await?;
        }
        post.revise(title, content, image_url);

        let post = self
            .posts
            .update(post)
            .await
            .map_err(|e| missing_post(e, post_id))?;

        if let Some(old) = replaced_image {
            self.discard_image(&old).await;
        }

        tracing::info!(post_id = %post.id, "Post updated");

        let details = self.with_creator(post).await?;
        self.notifier.publish(FeedEvent::Update {
            post: details.clone(),
        });
        Ok(details)
    }

    pub async fn delete_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        let post = self.find(post_id).await?;
        if !post.is_owned_by(user_id) {
            return Err(DomainError::Forbidden);
        }

        self.posts
            .delete(post.id)
            .await
            .map_err(|e| missing_post(e, post_id))?;
        self.discard_image(&post.image_url).await;

        match self.users.find_by_id(post.creator_id).await? {
            Some(mut owner) => {
                if owner.remove_post(post.id) {
                    self.users.update(owner).await?;
                }
            }
            None => tracing::warn!(user_id = %post.creator_id, "Owner of deleted post not found"),
        }

        tracing::info!(post_id = %post_id, "Post deleted");

        self.notifier.publish(FeedEvent::Delete { post_id });
        Ok(())
    }

    /// All posts of one user, newest first.
    pub async fn posts_by_creator(&self, user_id: Uuid) -> Result<Vec<PostDetails>, DomainError> {
        let posts = self.posts.find_by_creator(user_id).await?;
        self.with_creators(posts).await
    }

    async fn find(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    async fn with_creator(&self, post: Post) -> Result<PostDetails, DomainError> {
        let creator = self.users.find_by_id(post.creator_id).await?;
        Ok(PostDetails::new(post, creator.as_ref().map(CreatorSummary::from)))
    }

    async fn with_creators(&self, posts: Vec<Post>) -> Result<Vec<PostDetails>, DomainError> {
        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.creator_id).collect();
        ids.sort();
        ids.dedup();

        let creators: HashMap<Uuid, CreatorSummary> = self
            .users
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id, CreatorSummary::from(u)))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let creator = creators.get(&post.creator_id).cloned();
                PostDetails::new(post, creator)
            })
            .collect())
    }

    /// Remove an image no post references any more. Returns whether the file
    /// was deleted.
    pub async fn release_image(&self, image_url: &str) -> Result<bool, DomainError> {
        if self.posts.image_in_use(image_url).await? {
            tracing::debug!(image_url = %image_url, "Image still referenced, keeping it");
            return Ok(false);
        }
        self.images.remove(image_url).await?;
        Ok(true)
    }

    /// A post may only point at a stored image that no other post owns.
    async fn check_image_available(&self, image_url: &str) -> Result<(), DomainError> {
        let exists = self.images.exists(image_url).await?;
        let taken = exists && self.posts.image_in_use(image_url).await?;

        let mut validator = Validator::new();
        validator
            .check(exists, "image", "Image not found")
            .check(!taken, "image", "Image is attached to another post");
        validator.finish()
    }

    /// Image cleanup never fails the request.
    async fn discard_image(&self, image_url: &str) {
        if let Err(e) = self.release_image(image_url).await {
            tracing::warn!(image_url = %image_url, error = %e, "Failed to remove image");
        }
    }
}

fn missing_post(err: RepoError, post_id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("Post", post_id),
        other => other.into(),
    }
}

fn validate(input: PostInput) -> Result<(String, String, String), DomainError> {
    let title = input.title.trim().to_string();
    let content = input.content.trim().to_string();
    let image_url = input
        .image_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let mut validator = Validator::new();
    validator
        .min_len("title", &title, MIN_TEXT_LEN, "Title is too short")
        .min_len("content", &content, MIN_TEXT_LEN, "Content is too short")
        .check(image_url.is_some(), "image", "No image provided");
    validator.finish()?;

    // Checked just above.
    let image_url = image_url.unwrap_or_default();
    Ok((title, content, image_url))
}
