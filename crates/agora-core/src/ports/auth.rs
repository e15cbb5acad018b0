//! Authentication ports.

use async_trait::async_trait;
use chrono::TimeDelta;
use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    /// Unix timestamp (seconds).
    pub issued_at: i64,
    /// Unix timestamp (seconds).
    pub expires_at: i64,
}

/// Issues and verifies signed session tokens. Tokens are stateless and
/// cannot be revoked before they expire.
pub trait TokenService: Send + Sync {
    /// Issue a token with the configured lifetime.
    fn generate_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        self.generate_token_with_ttl(user_id, email, TimeDelta::seconds(self.expiration_seconds()))
    }

    /// Issue a token expiring `ttl` from now.
    fn generate_token_with_ttl(
        &self,
        user_id: Uuid,
        email: &str,
        ttl: TimeDelta,
    ) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Default token lifetime in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service. Hashing is slow on purpose, so both calls are async.
#[async_trait]
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    async fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
