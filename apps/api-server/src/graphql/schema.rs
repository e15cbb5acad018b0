use std::sync::Arc;

use async_graphql::{EmptySubscription, Schema};

use agora_core::services::{AuthService, FeedService};

use super::mutations::MutationRoot;
use super::queries::QueryRoot;

/// GraphQL Schema type
pub type AgoraSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema with the services resolvers call into.
///
/// The caller's [`AuthState`](crate::middleware::AuthState) is attached per request.
pub fn build_schema(auth: Arc<AuthService>, feed: Arc<FeedService>) -> AgoraSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(auth)
        .data(feed)
        .finish()
}
