//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod notifier;
mod repository;
mod storage;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use notifier::FeedNotifier;
pub use repository::{BaseRepository, PostRepository, UserRepository};
pub use storage::{ImageStore, StorageError};
