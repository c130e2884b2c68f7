//! Wire-level representations exchanged with the surrounding serving layer.
//!
//! Field names are camelCase on the wire. Output views skip absent optional
//! fields entirely rather than serializing nulls, so "no tag set" and
//! "empty tag set" survive a round trip.

use serde::{Deserialize, Serialize};

use crate::models::Post;

/// Upper bound on `content`, enforced before any storage mutation.
pub const MAX_CONTENT_LEN: usize = 1024;

/// Create/update request body for a post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    /// Ignored on create (storage assigns the id), required on update.
    #[serde(default)]
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category_id: i32,
    pub author_id: i32,
    #[serde(default)]
    pub image: Option<String>,
    /// Tag ids; unknown ids are dropped during resolution, not rejected.
    #[serde(default)]
    pub tags: Option<Vec<i32>>,
}

/// A single patch operation as received on the wire. Only `replace` is
/// supported; the path names one mutable post field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: String,
    pub path: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagView {
    pub id: i32,
    pub name: String,
}

/// External representation of a post. Relation fields are absent when the
/// relation was never resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: i32,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagView>>,
}

impl From<&Post> for PostView {
    /// Maps a post to its external shape. The relation ids come from the
    /// post's foreign-key columns, the names from the resolved entities;
    /// an unresolved relation maps to absent rather than failing.
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            image: post.image.clone(),
            category: post.category.as_ref().map(|c| CategoryView {
                id: post.category_id,
                name: c.name.clone(),
            }),
            author: post.author.as_ref().map(|a| AuthorView {
                id: post.author_id,
                name: a.name.clone(),
            }),
            tags: post.tags.as_ref().map(|tags| {
                tags.iter()
                    .map(|t| TagView {
                        id: t.id,
                        name: t.name.clone(),
                    })
                    .collect()
            }),
        }
    }
}
