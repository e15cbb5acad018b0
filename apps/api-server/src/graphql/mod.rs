//! GraphQL surface over the auth and feed services.

mod error;
mod mutations;
mod queries;
mod schema;
mod types;

pub use error::{GraphqlResultExt, reshape_errors, to_graphql_error};
pub use mutations::MutationRoot;
pub use queries::QueryRoot;
pub use schema::{AgoraSchema, build_schema};
