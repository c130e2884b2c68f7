//! # Post Service
//!
//! Orchestrates the post lifecycle against the storage port: validation,
//! tag resolution, persistence, the post-write relation reload, and the
//! mapping to external views. The service owns all entity mutation; no
//! other component writes to storage.

use std::sync::Arc;

use domains::{
    BlogError, BlogStore, CategoryView, PatchOp, Post, PostInput, PostView, Result, Tag, TagView,
    MAX_CONTENT_LEN,
};
use tracing::{debug, info};

use crate::filter::PostFilter;
use crate::patch;

pub struct PostService {
    store: Arc<dyn BlogStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// Creates a post. Unknown tag ids in the input are dropped rather
    /// than rejected. `Ok(None)` is the defensive path for an insert that
    /// yields no entity.
    pub async fn add_post(&self, input: PostInput) -> Result<Option<PostView>> {
        validate(&input)?;

        let tags = self.resolve_tag_ids(input.tags.as_deref()).await?;
        let post = Post {
            id: 0,
            title: input.title,
            content: input.content,
            category_id: input.category_id,
            author_id: input.author_id,
            image: input.image,
            category: None,
            author: None,
            tags,
        };

        let Some(mut created) = self.store.insert_post(post).await? else {
            return Ok(None);
        };
        self.load_references(&mut created).await?;
        info!(post_id = created.id, "post created");

        Ok(Some(PostView::from(&created)))
    }

    /// Full replace by `input.id`. Every field is overwritten and the tag
    /// set is replaced entirely; an absent or empty input tag list clears
    /// it. `Ok(None)` when the post does not exist, with no mutation.
    pub async fn update_post(&self, input: PostInput) -> Result<Option<PostView>> {
        validate(&input)?;

        let Some(mut post) = self.store.fetch_post(input.id).await? else {
            return Ok(None);
        };

        post.category_id = input.category_id;
        post.author_id = input.author_id;
        post.title = input.title;
        post.content = input.content;
        post.image = input.image;
        post.tags = self.resolve_tag_ids(input.tags.as_deref()).await?;

        self.store.save_post(&post).await?;
        self.load_references(&mut post).await?;
        info!(post_id = post.id, "post updated");

        Ok(Some(PostView::from(&post)))
    }

    /// Targeted partial update. The operation sequence is applied
    /// all-or-nothing; author and category are reloaded from their foreign
    /// keys afterwards, while tags set via patch are kept verbatim.
    pub async fn patch_post(&self, id: i32, ops: &[PatchOp]) -> Result<Option<PostView>> {
        let Some(post) = self.store.fetch_post(id).await? else {
            return Ok(None);
        };

        let mut patched = patch::apply(post, ops)?;
        self.store.save_post(&patched).await?;
        self.load_references(&mut patched).await?;
        info!(post_id = id, ops = ops.len(), "post patched");

        Ok(Some(PostView::from(&patched)))
    }

    /// Hard delete. Removing an absent id is a silent no-op, so the
    /// operation is idempotent. Join rows go with the post; the referenced
    /// tags, category and author stay.
    pub async fn delete_post(&self, id: i32) -> Result<()> {
        if self.store.fetch_post(id).await?.is_some() {
            self.store.remove_post(id).await?;
            info!(post_id = id, "post deleted");
        }
        Ok(())
    }

    /// Single lookup with full relation resolution.
    pub async fn get_post(&self, id: i32) -> Result<Option<PostView>> {
        let Some(mut post) = self.store.fetch_post(id).await? else {
            return Ok(None);
        };
        self.load_references(&mut post).await?;
        Ok(Some(PostView::from(&post)))
    }

    /// Returns every post matching the supplied criteria, in storage
    /// iteration order. An empty filter returns everything.
    pub async fn search_posts(&self, filter: &PostFilter) -> Result<Vec<PostView>> {
        let posts = self.store.fetch_all_posts().await?;
        Ok(filter.apply(posts).iter().map(PostView::from).collect())
    }

    pub async fn categories(&self) -> Result<Vec<CategoryView>> {
        let categories = self.store.list_categories().await?;
        Ok(categories
            .into_iter()
            .map(|c| CategoryView {
                id: c.id,
                name: c.name,
            })
            .collect())
    }

    pub async fn tags(&self) -> Result<Vec<TagView>> {
        let tags = self.store.list_tags().await?;
        Ok(tags
            .into_iter()
            .map(|t| TagView {
                id: t.id,
                name: t.name,
            })
            .collect())
    }

    /// Resolves an input tag-id list against storage. Absent and empty
    /// lists both mean "no tag set"; a present list resolves to whatever
    /// subset exists, which may be empty.
    async fn resolve_tag_ids(&self, ids: Option<&[i32]>) -> Result<Option<Vec<Tag>>> {
        let Some(ids) = ids.filter(|ids| !ids.is_empty()) else {
            return Ok(None);
        };

        let resolved = self.store.resolve_tags(ids).await?;
        if resolved.len() < ids.len() {
            debug!(
                requested = ids.len(),
                resolved = resolved.len(),
                "dropped unknown tag ids"
            );
        }
        Ok(Some(resolved))
    }

    /// The explicit post-write resolve step: reloads the author and
    /// category references from their foreign keys. Either may come back
    /// `None`; the view maps that to absent.
    async fn load_references(&self, post: &mut Post) -> Result<()> {
        post.author = self.store.fetch_author(post.author_id).await?;
        post.category = self.store.fetch_category(post.category_id).await?;
        Ok(())
    }
}

fn validate(input: &PostInput) -> Result<()> {
    if input.title.trim().is_empty() {
        return Err(BlogError::Validation("title is required".into()));
    }
    if input.content.trim().is_empty() {
        return Err(BlogError::Validation("content is required".into()));
    }
    if input.content.chars().count() > MAX_CONTENT_LEN {
        return Err(BlogError::Validation(format!(
            "content must not be more than {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}
