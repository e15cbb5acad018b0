//! # Agora API Server
//!
//! HTTP surfaces of the social feed: REST handlers, the GraphQL endpoint,
//! static image serving and the socket.io push channel.

pub mod config;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
pub mod uploads;

#[cfg(feature = "websocket")]
pub mod websocket;

use actix_cors::Cors;
use actix_web::http::{Method, header};

pub use config::AppConfig;
pub use state::AppState;

/// CORS policy: any origin, the verbs the API uses, JSON and bearer headers.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}
