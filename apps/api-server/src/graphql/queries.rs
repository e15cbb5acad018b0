use std::sync::Arc;

use async_graphql::{Context, ID, Object, Result};

use agora_core::services::{AuthService, FeedService};

use super::error::{GraphqlResultExt, parse_post_id, require_identity};
use super::types::{AuthData, PostData, PostObject, UserObject};

/// GraphQL Query root
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Exchange credentials for a session token
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthData> {
        let auth = ctx.data::<Arc<AuthService>>()?;
        let outcome = auth.login(&email, &password).await.into_gql()?;

        Ok(AuthData {
            token: outcome.token,
            user_id: outcome.user_id.to_string(),
            expires_in: outcome.expires_in,
        })
    }

    /// One page of posts, newest first
    async fn posts(&self, ctx: &Context<'_>, page: Option<i32>) -> Result<PostData> {
        let feed = ctx.data::<Arc<FeedService>>()?;
        let page = feed.list_posts(page.map(i64::from)).await.into_gql()?;

        Ok(PostData {
            posts: page.items.into_iter().map(PostObject).collect(),
            total_posts: page.total_items,
        })
    }

    async fn post(&self, ctx: &Context<'_>, id: ID) -> Result<PostObject> {
        let feed = ctx.data::<Arc<FeedService>>()?;
        let post_id = parse_post_id(&id)?;
        feed.get_post(post_id).await.map(PostObject).into_gql()
    }

    /// The authenticated user
    async fn user(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let identity = require_identity(ctx)?;
        let auth = ctx.data::<Arc<AuthService>>()?;
        auth.user(identity.user_id).await.map(UserObject).into_gql()
    }
}
