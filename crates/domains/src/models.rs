//! # Domain Models
//!
//! These structs represent the core entities of the blog. Ids are positive
//! `i32`s assigned by storage on insert.

use serde::{Deserialize, Serialize};

/// A person who writes posts. Read-only from the core's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i32,
    pub name: String,
}

/// The single category a post belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// A label attached to posts. Many-to-many with `Post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// The primary content entity.
///
/// `category`, `author` and `tags` are resolved relations. Storage leaves
/// `category`/`author` unresolved on single-post fetches; the service fills
/// them in with an explicit resolve step after every mutation. Consumers
/// must tolerate `None` in all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category_id: i32,
    pub author_id: i32,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub author: Option<Author>,
    /// `None` means "no tag set", distinct from an empty set.
    pub tags: Option<Vec<Tag>>,
}

impl Post {
    /// Resets resolved relations, keeping the foreign keys and tag links.
    pub fn without_references(mut self) -> Self {
        self.category = None;
        self.author = None;
        self
    }
}
