//! Signup, login and status management.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, normalize_email};
use crate::error::DomainError;
use crate::ports::{PasswordService, TokenService, UserRepository};
use crate::validation::{MIN_TEXT_LEN, Validator};

/// Input for [`AuthService::signup`].
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user_id: Uuid,
    pub expires_in: i64,
}

/// Account operations on top of the credential store and token service.
///
/// Each call is an independent transaction; nothing is cached between calls.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// Email uniqueness is checked before the insert, so two concurrent
    /// signups with the same address can both pass the check.
    pub async fn signup(&self, input: SignupInput) -> Result<User, DomainError> {
        let email = normalize_email(&input.email);
        let name = input.name.trim().to_string();
        let password = input.password.trim();

        let mut validator = Validator::new();
        validator
            .email("email", &email)
            .min_len(
                "password",
                password,
                MIN_TEXT_LEN,
                "Password must be at least 5 characters long",
            )
            .not_blank("name", &name, "Name must not be empty");
        validator.finish()?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate(
                "E-mail address already exists".to_string(),
            ));
        }

        let password_hash = self.passwords.hash(password).await?;
        let user = self.users.create(User::new(email, name, password_hash)).await?;

        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    /// Exchange credentials for a session token.
    ///
    /// Unknown email and wrong password fail with the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        let email = normalize_email(email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if !self.passwords.verify(password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::Unauthorized);
        }

        let token = self
            .tokens
            .generate_token(user.id, &user.email)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(LoginOutcome {
            token,
            user_id: user.id,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    /// Current status of the authenticated user.
    pub async fn status(&self, user_id: Uuid) -> Result<String, DomainError> {
        let user = self.account(user_id).await?;
        Ok(user.status)
    }

    /// Replace the authenticated user's status.
    pub async fn update_status(&self, user_id: Uuid, status: &str) -> Result<User, DomainError> {
        let status = status.trim();

        let mut validator = Validator::new();
        validator.not_blank("status", status, "Status must not be empty");
        validator.finish()?;

        let mut user = self.account(user_id).await?;
        user.set_status(status.to_string());
        self.users.update(user).await.map_err(|e| match e {
            crate::error::RepoError::NotFound => DomainError::Forbidden,
            other => other.into(),
        })
    }

    /// Profile lookup.
    pub async fn user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    /// A token can outlive its account; such callers are refused.
    async fn account(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_STATUS;
    use crate::ports::TokenService;
    use crate::services::testing::{FakeTokens, MemoryUsers, PlainPasswords};

    fn service() -> (AuthService, Arc<MemoryUsers>, Arc<FakeTokens>) {
        let users = Arc::new(MemoryUsers::default());
        let tokens = Arc::new(FakeTokens);
        let service = AuthService::new(users.clone(), Arc::new(PlainPasswords), tokens.clone());
        (service, users, tokens)
    }

    fn alice() -> SignupInput {
        SignupInput {
            email: "a@x.com".to_string(),
            name: "Alice".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_hashes_and_defaults_status() {
        let (service, _, _) = service();

        let user = service.signup(alice()).await.unwrap();

        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.status, DEFAULT_STATUS);
        assert_ne!(user.password_hash, "secret1");
    }

    #[tokio::test]
    async fn test_signup_normalizes_email_and_rejects_duplicates() {
        let (service, _, _) = service();
        service.signup(alice()).await.unwrap();

        let mut again = alice();
        again.email = "  A@X.com ".to_string();
        let err = service.signup(again).await.unwrap_err();

        assert!(matches!(err, DomainError::Duplicate(_)));
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_signup_reports_every_invalid_field() {
        let (service, users, _) = service();

        let err = service
            .signup(SignupInput {
                email: "nope".to_string(),
                name: "  ".to_string(),
                password: "abc".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            DomainError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let (service, _, tokens) = service();
        let user = service.signup(alice()).await.unwrap();

        let outcome = service.login("A@x.com", "secret1").await.unwrap();

        assert_eq!(outcome.user_id, user.id);
        let claims = tokens.validate_token(&outcome.token).unwrap();
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_signup_stores_the_trimmed_password() {
        let (service, users, _) = service();
        let mut padded = alice();
        padded.password = "  secret1 ".to_string();
        let user = service.signup(padded).await.unwrap();

        assert_eq!(users.get(user.id).unwrap().password_hash, "hashed:secret1");
        assert!(service.login("a@x.com", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _, _) = service();
        service.signup(alice()).await.unwrap();

        let wrong_password = service.login("a@x.com", "secret2").await.unwrap_err();
        let unknown_email = service.login("b@x.com", "secret1").await.unwrap_err();

        assert!(matches!(wrong_password, DomainError::Unauthorized));
        assert!(matches!(unknown_email, DomainError::Unauthorized));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_status_roundtrip() {
        let (service, _, _) = service();
        let user = service.signup(alice()).await.unwrap();

        service.update_status(user.id, " Busy coding ").await.unwrap();

        assert_eq!(service.status(user.id).await.unwrap(), "Busy coding");
    }

    #[tokio::test]
    async fn test_status_of_missing_user_is_forbidden() {
        let (service, _, _) = service();

        let err = service.status(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let err = service
            .update_status(Uuid::new_v4(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn test_blank_status_rejected() {
        let (service, _, _) = service();
        let user = service.signup(alice()).await.unwrap();

        let err = service.update_status(user.id, "   ").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
