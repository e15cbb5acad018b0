//! Error shaping for GraphQL responses.

use async_graphql::{Context, ErrorExtensions, Number, Value};
use serde_json::Map;
use uuid::Uuid;

use agora_core::DomainError;

use crate::middleware::{AppError, AuthState, Identity};

/// Convert an application error into a GraphQL error carrying
/// `statusCode` and `data` extensions.
pub fn to_graphql_error(err: AppError) -> async_graphql::Error {
    if let AppError::Internal(detail) = &err {
        tracing::error!("Internal error: {}", detail);
    }

    let body = err.to_error_response();
    let data = body.data.and_then(|d| Value::from_json(d).ok());
    let status_code = body.status_code;

    async_graphql::Error::new(body.message).extend_with(move |_, ext| {
        ext.set("statusCode", Value::Number(Number::from(status_code)));
        if let Some(data) = data {
            ext.set("data", data);
        }
    })
}

/// `.into_gql()` on service results.
pub trait GraphqlResultExt<T> {
    fn into_gql(self) -> async_graphql::Result<T>;
}

impl<T> GraphqlResultExt<T> for Result<T, DomainError> {
    fn into_gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| to_graphql_error(e.into()))
    }
}

impl<T> GraphqlResultExt<T> for Result<T, AppError> {
    fn into_gql(self) -> async_graphql::Result<T> {
        self.map_err(to_graphql_error)
    }
}

/// The authenticated caller, or a 401 error.
pub(crate) fn require_identity<'c>(ctx: &Context<'c>) -> async_graphql::Result<&'c Identity> {
    ctx.data_opt::<AuthState>()
        .and_then(AuthState::identity)
        .ok_or_else(|| to_graphql_error(AppError::AuthenticationRequired))
}

pub(crate) fn parse_post_id(id: &str) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id)
        .map_err(|_| to_graphql_error(AppError::NotFound("Could not find post.".to_string())))
}

/// Flatten errors raised by resolvers to `{message, statusCode, data}`.
///
/// Errors produced by the executor itself (syntax, unknown fields) carry no
/// `statusCode` and are passed through untouched.
pub fn reshape_errors(mut body: serde_json::Value) -> serde_json::Value {
    if let Some(errors) = body
        .get_mut("errors")
        .and_then(serde_json::Value::as_array_mut)
    {
        for error in errors.iter_mut() {
            reshape(error);
        }
    }
    body
}

fn reshape(error: &mut serde_json::Value) {
    let Some(extensions) = error
        .get("extensions")
        .and_then(serde_json::Value::as_object)
    else {
        return;
    };
    let Some(status_code) = extensions.get("statusCode").cloned() else {
        return;
    };
    let data = extensions.get("data").cloned();
    let message = error
        .get("message")
        .cloned()
        .unwrap_or_else(|| "An error occurred.".into());

    let mut flat = Map::new();
    flat.insert("message".to_string(), message);
    flat.insert("statusCode".to_string(), status_code);
    if let Some(data) = data {
        flat.insert("data".to_string(), data);
    }
    *error = serde_json::Value::Object(flat);
}
