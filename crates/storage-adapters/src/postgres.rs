//! # Postgres store
//!
//! Maps the relational model (posts, authors, categories, tags, and the
//! post_tags join table) back to the domain models. Inserts and saves run
//! in a transaction so a post row and its tag links never diverge.

use std::collections::HashMap;

use async_trait::async_trait;
use configs::DatabaseSettings;
use domains::{Author, BlogStore, Category, Post, Tag};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

pub struct PgBlogStore {
    pool: PgPool,
}

impl PgBlogStore {
    pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(settings.connection_string())
            .await?;

        if settings.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("migrations applied");
        }

        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn post_tags(&self, post_id: i32) -> anyhow::Result<Option<Vec<Tag>>> {
        let rows = sqlx::query(
            "SELECT t.id, t.name FROM tags t \
             JOIN post_tags pt ON pt.tag_id = t.id \
             WHERE pt.post_id = $1 ORDER BY t.id",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        // No join rows means "no tag set", which the mapper keeps distinct
        // from an empty set.
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.iter().map(row_to_tag).collect()))
    }
}

fn row_to_post(row: &PgRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        category_id: row.get("category_id"),
        author_id: row.get("author_id"),
        image: row.get("image"),
        category: None,
        author: None,
        tags: None,
    }
}

fn row_to_tag(row: &PgRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
    }
}

#[async_trait]
impl BlogStore for PgBlogStore {
    async fn insert_post(&self, mut post: Post) -> anyhow::Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "INSERT INTO posts (title, content, category_id, author_id, image) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.category_id)
        .bind(post.author_id)
        .bind(&post.image)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        post.id = row.get("id");

        if let Some(tags) = &post.tags {
            for tag in tags {
                sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
                    .bind(post.id)
                    .bind(tag.id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(post))
    }

    async fn fetch_post(&self, id: i32) -> anyhow::Result<Option<Post>> {
        let row = sqlx::query(
            "SELECT id, title, content, category_id, author_id, image \
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut post = row_to_post(&row);
        post.tags = self.post_tags(id).await?;
        Ok(Some(post))
    }

    async fn fetch_all_posts(&self) -> anyhow::Result<Vec<Post>> {
        let post_rows = sqlx::query(
            "SELECT id, title, content, category_id, author_id, image \
             FROM posts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let authors: HashMap<i32, Author> = sqlx::query("SELECT id, name FROM authors")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                (
                    row.get("id"),
                    Author {
                        id: row.get("id"),
                        name: row.get("name"),
                    },
                )
            })
            .collect();

        let categories: HashMap<i32, Category> = sqlx::query("SELECT id, name FROM categories")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                (
                    row.get("id"),
                    Category {
                        id: row.get("id"),
                        name: row.get("name"),
                    },
                )
            })
            .collect();

        let mut links: HashMap<i32, Vec<Tag>> = HashMap::new();
        let link_rows = sqlx::query(
            "SELECT pt.post_id, t.id, t.name FROM post_tags pt \
             JOIN tags t ON t.id = pt.tag_id ORDER BY pt.post_id, t.id",
        )
        .fetch_all(&self.pool)
        .await?;
        for row in &link_rows {
            links
                .entry(row.get("post_id"))
                .or_default()
                .push(row_to_tag(row));
        }

        Ok(post_rows
            .iter()
            .map(|row| {
                let mut post = row_to_post(row);
                post.author = authors.get(&post.author_id).cloned();
                post.category = categories.get(&post.category_id).cloned();
                post.tags = links.remove(&post.id);
                post
            })
            .collect())
    }

    async fn save_post(&self, post: &Post) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE posts SET title = $1, content = $2, category_id = $3, \
             author_id = $4, image = $5 WHERE id = $6",
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.category_id)
        .bind(post.author_id)
        .bind(&post.image)
        .bind(post.id)
        .execute(&mut *tx)
        .await?;

        // Full tag-link replacement: drop and re-insert.
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post.id)
            .execute(&mut *tx)
            .await?;
        if let Some(tags) = &post.tags {
            for tag in tags {
                sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
                    .bind(post.id)
                    .bind(tag.id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove_post(&self, id: i32) -> anyhow::Result<()> {
        // post_tags rows go via ON DELETE CASCADE.
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch_author(&self, id: i32) -> anyhow::Result<Option<Author>> {
        let row = sqlx::query("SELECT id, name FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| Author {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    async fn fetch_category(&self, id: i32) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| Category {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    async fn resolve_tags(&self, ids: &[i32]) -> anyhow::Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name FROM tags WHERE id = ANY($1) ORDER BY id")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_tag).collect())
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| Category {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn list_tags(&self) -> anyhow::Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_tag).collect())
    }
}
