//! GraphQL endpoint.

use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use async_graphql::http::GraphiQLSource;

use crate::graphql::reshape_errors;
use crate::middleware::{AppError, AppResult, AuthState};
use crate::state::AppState;

/// POST /graphql
pub async fn graphql_handler(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<async_graphql::Request>,
) -> AppResult<HttpResponse> {
    let auth = req
        .extensions()
        .get::<AuthState>()
        .cloned()
        .unwrap_or_default();

    let response = state.schema.execute(body.into_inner().data(auth)).await;
    let body = serde_json::to_value(&response).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(reshape_errors(body)))
}

/// GET /graphql - GraphiQL IDE
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
