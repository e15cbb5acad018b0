//! Error handling - `{message, statusCode, data}` responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use agora_core::DomainError;
use agora_core::validation::FieldError;
use agora_shared::ErrorResponse;

/// Application-level error type shared by the REST handlers and GraphQL resolvers.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// No usable session token on a route that needs one.
    AuthenticationRequired,
    /// Rejected credentials.
    Unauthorized(String),
    Forbidden,
    Conflict(String),
    /// Request body over an upload limit.
    PayloadTooLarge(String),
    Validation(Vec<FieldError>),
    Internal(String),
}

impl AppError {
    /// Client-facing message. Internal details never leave the server.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::AuthenticationRequired => "Not authenticated.".to_string(),
            AppError::Forbidden => "Not authorized.".to_string(),
            AppError::Validation(_) => "Validation failed, entered data is incorrect.".to_string(),
            AppError::Internal(_) => "An error occurred.".to_string(),
        }
    }

    /// Body sent to clients; also used for GraphQL error extensions.
    pub fn to_error_response(&self) -> ErrorResponse {
        let body = ErrorResponse::new(self.status_code().as_u16(), self.message());
        match self {
            AppError::Validation(errors) => match serde_json::to_value(errors) {
                Ok(data) => body.with_data(data),
                Err(_) => body,
            },
            _ => body,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::AuthenticationRequired => write!(f, "Authentication required"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationRequired | AppError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }

        HttpResponse::build(self.status_code()).json(self.to_error_response())
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("Could not find {}.", entity_type.to_lowercase()))
            }
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized(DomainError::Unauthorized.to_string()),
            DomainError::AuthenticationRequired => AppError::AuthenticationRequired,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
