//! # In-memory store
//!
//! Dashmap-backed implementation of `BlogStore` with an atomic id counter.
//! Iteration-order queries sort by id, which for seeded and sequentially
//! inserted data matches insertion order. Used as the storage substitute
//! in the service and integration test suites.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{Author, BlogStore, Category, Post, Tag};

#[derive(Default)]
pub struct MemoryStore {
    posts: DashMap<i32, Post>,
    authors: DashMap<i32, Author>,
    categories: DashMap<i32, Category>,
    tags: DashMap<i32, Tag>,
    /// Last assigned post id.
    post_id: AtomicI32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the demo dataset: authors Jane and Bob,
    /// categories Travel and Food, tags Travel / Food / Healthy life, and
    /// two posts ("Travel" with tag 1, "Food" with tags 2 and 3).
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        store.seed_author(Author {
            id: 1,
            name: "Jane".into(),
        });
        store.seed_author(Author {
            id: 2,
            name: "Bob".into(),
        });
        store.seed_category(Category {
            id: 1,
            name: "Travel".into(),
        });
        store.seed_category(Category {
            id: 2,
            name: "Food".into(),
        });
        store.seed_tag(Tag {
            id: 1,
            name: "Travel".into(),
        });
        store.seed_tag(Tag {
            id: 2,
            name: "Food".into(),
        });
        store.seed_tag(Tag {
            id: 3,
            name: "Healthy life".into(),
        });
        store.seed_post(Post {
            id: 1,
            title: "Travel".into(),
            content: "Some of the most beautiful things to do".into(),
            category_id: 1,
            author_id: 1,
            image: Some("https://i0.wp.com/files.tripstodiscover.com/files/2014/06/Cinque-Tierre.jpg".into()),
            category: None,
            author: None,
            tags: Some(vec![Tag {
                id: 1,
                name: "Travel".into(),
            }]),
        });
        store.seed_post(Post {
            id: 2,
            title: "Food".into(),
            content: "Chose wisely it sustain your health".into(),
            category_id: 2,
            author_id: 2,
            image: None,
            category: None,
            author: None,
            tags: Some(vec![
                Tag {
                    id: 2,
                    name: "Food".into(),
                },
                Tag {
                    id: 3,
                    name: "Healthy life".into(),
                },
            ]),
        });
        store
    }

    pub fn seed_author(&self, author: Author) {
        self.authors.insert(author.id, author);
    }

    pub fn seed_category(&self, category: Category) {
        self.categories.insert(category.id, category);
    }

    pub fn seed_tag(&self, tag: Tag) {
        self.tags.insert(tag.id, tag);
    }

    /// Inserts a post under its given id and bumps the id counter so later
    /// inserts never collide with seeded rows.
    pub fn seed_post(&self, post: Post) {
        self.post_id.fetch_max(post.id, Ordering::SeqCst);
        self.posts.insert(post.id, post.without_references());
    }

    fn sorted<T: Clone>(map: &DashMap<i32, T>) -> Vec<T> {
        let mut entries: Vec<(i32, T)> = map
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, v)| v).collect()
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn insert_post(&self, mut post: Post) -> anyhow::Result<Option<Post>> {
        post.id = self.post_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.posts.insert(post.id, post.clone().without_references());
        Ok(Some(post))
    }

    async fn fetch_post(&self, id: i32) -> anyhow::Result<Option<Post>> {
        Ok(self.posts.get(&id).map(|p| p.value().clone()))
    }

    async fn fetch_all_posts(&self) -> anyhow::Result<Vec<Post>> {
        let posts = Self::sorted(&self.posts)
            .into_iter()
            .map(|mut post| {
                post.author = self.authors.get(&post.author_id).map(|a| a.value().clone());
                post.category = self
                    .categories
                    .get(&post.category_id)
                    .map(|c| c.value().clone());
                post
            })
            .collect();
        Ok(posts)
    }

    async fn save_post(&self, post: &Post) -> anyhow::Result<()> {
        self.posts.insert(post.id, post.clone().without_references());
        Ok(())
    }

    async fn remove_post(&self, id: i32) -> anyhow::Result<()> {
        if self.posts.remove(&id).is_some() {
            tracing::debug!(post_id = id, "post removed");
        }
        Ok(())
    }

    async fn fetch_author(&self, id: i32) -> anyhow::Result<Option<Author>> {
        Ok(self.authors.get(&id).map(|a| a.value().clone()))
    }

    async fn fetch_category(&self, id: i32) -> anyhow::Result<Option<Category>> {
        Ok(self.categories.get(&id).map(|c| c.value().clone()))
    }

    async fn resolve_tags(&self, ids: &[i32]) -> anyhow::Result<Vec<Tag>> {
        // Deduplicated and ascending by id, mirroring the SQL adapter.
        let unique: BTreeSet<i32> = ids.iter().copied().collect();
        Ok(unique
            .into_iter()
            .filter_map(|id| self.tags.get(&id).map(|t| t.value().clone()))
            .collect())
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        Ok(Self::sorted(&self.categories))
    }

    async fn list_tags(&self) -> anyhow::Result<Vec<Tag>> {
        Ok(Self::sorted(&self.tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_sequential_ids_after_seed() {
        let store = MemoryStore::with_demo_data();
        let post = Post {
            id: 0,
            title: "New".into(),
            content: "c".into(),
            category_id: 1,
            author_id: 1,
            image: None,
            category: None,
            author: None,
            tags: None,
        };

        let created = store.insert_post(post).await.unwrap().unwrap();
        assert_eq!(created.id, 3);
    }

    #[tokio::test]
    async fn fetch_all_resolves_references_in_id_order() {
        let store = MemoryStore::with_demo_data();
        let posts = store.fetch_all_posts().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, 1);
        assert_eq!(posts[0].author.as_ref().unwrap().name, "Jane");
        assert_eq!(posts[1].category.as_ref().unwrap().name, "Food");
    }

    #[tokio::test]
    async fn resolve_tags_drops_unknown_and_duplicate_ids() {
        let store = MemoryStore::with_demo_data();
        let tags = store.resolve_tags(&[3, 3, 42, 1]).await.unwrap();

        assert_eq!(
            tags.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[tokio::test]
    async fn remove_post_leaves_tags_and_categories_alone() {
        let store = MemoryStore::with_demo_data();
        store.remove_post(2).await.unwrap();

        assert!(store.fetch_post(2).await.unwrap().is_none());
        assert_eq!(store.list_tags().await.unwrap().len(), 3);
        assert_eq!(store.list_categories().await.unwrap().len(), 2);
    }
}
