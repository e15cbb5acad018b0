//! Application services - the use cases exposed over REST and GraphQL.

mod auth;
mod feed;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthService, LoginOutcome, SignupInput};
pub use feed::{FeedService, PostInput};
