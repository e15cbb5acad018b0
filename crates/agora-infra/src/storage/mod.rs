//! Image storage implementations.

mod local;

pub use local::{LocalImageStore, PUBLIC_PREFIX};
