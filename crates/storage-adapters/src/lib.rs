//! Storage adapters implementing the `domains::BlogStore` port.
//!
//! The in-memory store is always compiled and backs the test suites; the
//! Postgres store sits behind the `db-postgres` feature.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgBlogStore;
