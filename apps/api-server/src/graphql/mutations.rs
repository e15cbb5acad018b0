use std::sync::Arc;

use async_graphql::{Context, ID, Object, Result};

use agora_core::services::{AuthService, FeedService, SignupInput};

use super::error::{GraphqlResultExt, parse_post_id, require_identity};
use super::types::{PostInputData, PostObject, UserInputData, UserObject};

/// GraphQL Mutation root
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register a new account
    async fn create_user(&self, ctx: &Context<'_>, user_input: UserInputData) -> Result<UserObject> {
        let auth = ctx.data::<Arc<AuthService>>()?;
        auth.signup(SignupInput {
            email: user_input.email,
            name: user_input.name,
            password: user_input.password,
        })
        .await
        .map(UserObject)
        .into_gql()
    }

    async fn create_post(&self, ctx: &Context<'_>, post_input: PostInputData) -> Result<PostObject> {
        let identity = require_identity(ctx)?;
        let feed = ctx.data::<Arc<FeedService>>()?;
        feed.create_post(identity.user_id, post_input.into())
            .await
            .map(PostObject)
            .into_gql()
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        post_input: PostInputData,
    ) -> Result<PostObject> {
        let identity = require_identity(ctx)?;
        let feed = ctx.data::<Arc<FeedService>>()?;
        let post_id = parse_post_id(&id)?;
        feed.update_post(identity.user_id, post_id, post_input.into())
            .await
            .map(PostObject)
            .into_gql()
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let identity = require_identity(ctx)?;
        let feed = ctx.data::<Arc<FeedService>>()?;
        let post_id = parse_post_id(&id)?;
        feed.delete_post(identity.user_id, post_id).await.into_gql()?;
        Ok(true)
    }

    async fn update_status(&self, ctx: &Context<'_>, status: String) -> Result<UserObject> {
        let identity = require_identity(ctx)?;
        let auth = ctx.data::<Arc<AuthService>>()?;
        auth.update_status(identity.user_id, &status)
            .await
            .map(UserObject)
            .into_gql()
    }
}
