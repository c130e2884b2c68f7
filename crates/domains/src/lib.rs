//! The central domain definitions for the blog backend: entity models,
//! wire-level representations, the shared error type, and the storage port.

pub mod dto;
pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use dto::*;
pub use error::*;
pub use models::*;
pub use ports::*;
