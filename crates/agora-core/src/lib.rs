//! # Agora Core
//!
//! The domain layer of the Agora social feed.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, ports, validation rules and the auth/feed services built on them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::DomainError;
