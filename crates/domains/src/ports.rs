//! # Storage Port
//!
//! The persistence contract the post service is written against. Two
//! adapters implement it: a Postgres-backed store and an in-memory store
//! used by the test suites.

use async_trait::async_trait;

use crate::models::{Author, Category, Post, Tag};

/// Data persistence contract for posts and their related entities.
///
/// Failures are opaque `anyhow` errors; the service wraps them into
/// `BlogError::Storage` without retrying.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Persists a new post and returns it with its storage-assigned id.
    /// `None` is the defensive path for an insert that yields no entity.
    async fn insert_post(&self, post: Post) -> anyhow::Result<Option<Post>>;

    /// Single-post lookup. Tag associations are loaded; `category` and
    /// `author` are left unresolved for the service to fill in.
    async fn fetch_post(&self, id: i32) -> anyhow::Result<Option<Post>>;

    /// All posts in storage iteration order, with author, category and
    /// tags resolved. Backs the search operation.
    async fn fetch_all_posts(&self) -> anyhow::Result<Vec<Post>>;

    /// Persists an existing post's scalar fields and replaces its tag
    /// links with the post's current tag set.
    async fn save_post(&self, post: &Post) -> anyhow::Result<()>;

    /// Removes a post and its tag links (never the tags themselves).
    /// Absent ids are tolerated.
    async fn remove_post(&self, id: i32) -> anyhow::Result<()>;

    async fn fetch_author(&self, id: i32) -> anyhow::Result<Option<Author>>;

    async fn fetch_category(&self, id: i32) -> anyhow::Result<Option<Category>>;

    /// Resolves tag ids to existing tags. Ids with no matching tag are
    /// dropped, not an error.
    async fn resolve_tags(&self, ids: &[i32]) -> anyhow::Result<Vec<Tag>>;

    async fn list_categories(&self) -> anyhow::Result<Vec<Category>>;

    async fn list_tags(&self) -> anyhow::Result<Vec<Tag>>;
}
