//! # Agora Shared
//!
//! Request and response bodies of the REST API.
//! Field names follow the camelCase wire format expected by web clients.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
