//! Configuration for backdrop rendering
//!
//! Provides types and loading for `aura.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
