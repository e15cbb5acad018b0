use std::sync::Arc;

use async_graphql::{Context, ID, InputObject, Object, Result, SimpleObject};

use agora_core::domain::{PostDetails, User};
use agora_core::services::{AuthService, FeedService, PostInput};

use super::error::GraphqlResultExt;

/// A feed post
pub struct PostObject(pub PostDetails);

#[Object(name = "Post")]
impl PostObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.0.post.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.post.title
    }

    async fn content(&self) -> &str {
        &self.0.post.content
    }

    async fn image_url(&self) -> &str {
        &self.0.post.image_url
    }

    /// Author of the post
    async fn creator(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let auth = ctx.data::<Arc<AuthService>>()?;
        auth.user(self.0.post.creator_id)
            .await
            .map(UserObject)
            .into_gql()
    }

    /// RFC 3339 timestamp
    async fn created_at(&self) -> String {
        self.0.post.created_at.to_rfc3339()
    }

    async fn updated_at(&self) -> String {
        self.0.post.updated_at.to_rfc3339()
    }
}

/// A registered account. The password hash is never exposed.
pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn status(&self) -> &str {
        &self.0.status
    }

    /// Posts written by this user, newest first
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostObject>> {
        let feed = ctx.data::<Arc<FeedService>>()?;
        let posts = feed.posts_by_creator(self.0.id).await.into_gql()?;
        Ok(posts.into_iter().map(PostObject).collect())
    }
}

/// Session token returned by `login`
#[derive(SimpleObject)]
pub struct AuthData {
    pub token: String,
    pub user_id: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// One page of the feed
#[derive(SimpleObject)]
pub struct PostData {
    pub posts: Vec<PostObject>,
    /// Number of posts across all pages
    pub total_posts: u64,
}

#[derive(InputObject)]
#[graphql(name = "UserInputData")]
pub struct UserInputData {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(InputObject)]
#[graphql(name = "PostInputData")]
pub struct PostInputData {
    pub title: String,
    pub content: String,
    /// Path returned by `PUT /post-image`
    pub image_url: String,
}

impl From<PostInputData> for PostInput {
    fn from(input: PostInputData) -> Self {
        Self {
            title: input.title,
            content: input.content,
            image_url: Some(input.image_url),
        }
    }
}
