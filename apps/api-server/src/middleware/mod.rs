//! Middleware modules.

pub mod auth;
pub mod error;

pub use auth::{AuthMiddleware, AuthState, Identity};
pub use error::{AppError, AppResult};
