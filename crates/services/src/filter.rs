//! # Filter Composer
//!
//! Builds the search predicate over the post collection. Pure: applying a
//! filter never mutates the posts and is stable across invocations.

use domains::Post;
use serde::Deserialize;

/// The three optional search criteria, ANDed together. Omitted criteria
/// impose no constraint. The wire names match the search query parameters
/// (`title`, `category`, `tags`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilter {
    pub title: Option<String>,
    #[serde(rename = "category")]
    pub category_id: Option<i32>,
    #[serde(rename = "tags")]
    pub tag_ids: Option<Vec<i32>>,
}

impl PostFilter {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Narrows `posts` to those matching every supplied criterion,
    /// preserving the input order.
    pub fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        posts.into_iter().filter(|p| self.matches(p)).collect()
    }

    pub fn matches(&self, post: &Post) -> bool {
        // Category equality, applied only for positive ids.
        if let Some(category_id) = self.category_id {
            if category_id > 0 && post.category_id != category_id {
                return false;
            }
        }

        // Case-sensitive substring match on the title.
        if let Some(title) = self.title.as_deref() {
            if !title.is_empty() && !post.title.contains(title) {
                return false;
            }
        }

        // OR within the tag set: any shared tag id qualifies the post.
        if let Some(tag_ids) = self.tag_ids.as_deref() {
            if !tag_ids.is_empty() {
                let post_tags = post.tags.as_deref().unwrap_or_default();
                if !post_tags.iter().any(|t| tag_ids.contains(&t.id)) {
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::Tag;

    fn post(id: i32, title: &str, category_id: i32, tag_ids: &[i32]) -> Post {
        Post {
            id,
            title: title.into(),
            content: "content".into(),
            category_id,
            author_id: 1,
            image: None,
            category: None,
            author: None,
            tags: Some(
                tag_ids
                    .iter()
                    .map(|&id| Tag {
                        id,
                        name: format!("tag-{id}"),
                    })
                    .collect(),
            ),
        }
    }

    fn collection() -> Vec<Post> {
        vec![
            post(1, "Travel", 1, &[1]),
            post(2, "Food", 2, &[2, 3]),
            post(3, "Fast Food chains", 2, &[2]),
        ]
    }

    #[test]
    fn no_criteria_passes_everything_in_order() {
        let filter = PostFilter::default();
        let result = filter.apply(collection());
        assert_eq!(
            result.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn title_is_a_case_sensitive_substring_match() {
        let result = PostFilter::by_title("Food").apply(collection());
        assert_eq!(result.len(), 2);

        let result = PostFilter::by_title("food").apply(collection());
        assert!(result.is_empty());
    }

    #[test]
    fn empty_title_imposes_no_constraint() {
        let result = PostFilter::by_title("").apply(collection());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn non_positive_category_is_ignored() {
        let filter = PostFilter {
            category_id: Some(0),
            ..PostFilter::default()
        };
        assert_eq!(filter.apply(collection()).len(), 3);

        let filter = PostFilter {
            category_id: Some(2),
            ..PostFilter::default()
        };
        assert_eq!(filter.apply(collection()).len(), 2);
    }

    #[test]
    fn any_shared_tag_qualifies_a_post() {
        let filter = PostFilter {
            tag_ids: Some(vec![3, 42]),
            ..PostFilter::default()
        };
        let result = filter.apply(collection());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn criteria_are_anded() {
        let filter = PostFilter {
            title: Some("Food".into()),
            category_id: Some(2),
            tag_ids: Some(vec![3]),
        };
        let result = filter.apply(collection());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn untagged_posts_never_match_a_tag_filter() {
        let mut p = post(9, "Untagged", 1, &[]);
        p.tags = None;
        let filter = PostFilter {
            tag_ids: Some(vec![1]),
            ..PostFilter::default()
        };
        assert!(!filter.matches(&p));
    }
}
