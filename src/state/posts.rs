//! Post catalog state for the admin and editor dashboards.
//!
//! DESIGN
//! ======
//! The catalog is in-memory and owned by one dashboard view. Filtering,
//! counting, and the create/edit/delete flow are plain methods so the view
//! only wires signals to them.

#[cfg(test)]
#[path = "posts_test.rs"]
mod posts_test;

use serde::{Deserialize, Serialize};

use crate::util::markdown::plain_text_excerpt;

/// Length of an excerpt derived from post content.
pub const EXCERPT_CHARS: usize = 160;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "published" { Self::Published } else { Self::Draft }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u32,
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub excerpt: String,
    pub category_id: u32,
    pub status: PostStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Editor form contents. `id` is set when editing an existing post.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub id: Option<u32>,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category_id: Option<u32>,
    pub status: PostStatus,
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            id: Some(post.id),
            title: post.title.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            category_id: Some(post.category_id),
            status: post.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostError {
    #[error("title is required")]
    EmptyTitle,
    #[error("unknown category {0}")]
    UnknownCategory(u32),
    #[error("no categories are available")]
    NoCategories,
    #[error("post {0} not found")]
    NotFound(u32),
}

impl PostError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "E_POST_TITLE",
            Self::UnknownCategory(_) | Self::NoCategories => "E_POST_CATEGORY",
            Self::NotFound(_) => "E_POST_NOT_FOUND",
        }
    }
}

/// Dashboard counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostStats {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
    pub categories: usize,
}

/// Posts, categories, list filters, and the open editor (if any).
#[derive(Clone, Debug, Default)]
pub struct PostsState {
    pub posts: Vec<Post>,
    pub categories: Vec<Category>,
    pub search: String,
    pub category_filter: Option<u32>,
    /// `Some` while the editor is open.
    pub editing: Option<PostDraft>,
}

impl PostsState {
    #[must_use]
    pub fn new(posts: Vec<Post>, categories: Vec<Category>) -> Self {
        Self { posts, categories, ..Self::default() }
    }

    /// Posts matching the search text (title or excerpt, case-insensitive)
    /// and the category filter.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Post> {
        let needle = self.search.trim().to_lowercase();
        self.posts
            .iter()
            .filter(|post| {
                needle.is_empty()
                    || post.title.to_lowercase().contains(&needle)
                    || post.excerpt.to_lowercase().contains(&needle)
            })
            .filter(|post| self.category_filter.is_none_or(|id| post.category_id == id))
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> PostStats {
        let published = self
            .posts
            .iter()
            .filter(|post| post.status == PostStatus::Published)
            .count();
        PostStats {
            total: self.posts.len(),
            published,
            drafts: self.posts.len() - published,
            categories: self.categories.len(),
        }
    }

    #[must_use]
    pub fn category(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    #[must_use]
    pub fn category_name(&self, id: u32) -> &str {
        self.category(id).map_or("Uncategorized", |category| category.name.as_str())
    }

    pub fn begin_create(&mut self) {
        self.editing = Some(PostDraft::default());
    }

    /// Open the editor on an existing post.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::NotFound`] if no post has `id`.
    pub fn begin_edit(&mut self, id: u32) -> Result<(), PostError> {
        let post = self.posts.iter().find(|post| post.id == id).ok_or(PostError::NotFound(id))?;
        self.editing = Some(PostDraft::from(post));
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Store `draft` and close the editor. Returns the id of the saved post.
    ///
    /// # Errors
    ///
    /// Returns a [`PostError`] for an empty title, an unknown category, or an
    /// id that no longer exists. The editor stays open on error.
    pub fn save(&mut self, draft: PostDraft, now: &str) -> Result<u32, PostError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(PostError::EmptyTitle);
        }
        let category_id = match draft.category_id {
            Some(id) => self.category(id).map(|category| category.id).ok_or(PostError::UnknownCategory(id))?,
            None => self.categories.first().map(|category| category.id).ok_or(PostError::NoCategories)?,
        };
        let excerpt = match draft.excerpt.trim() {
            "" => plain_text_excerpt(&draft.content, EXCERPT_CHARS),
            given => given.to_owned(),
        };

        let id = match draft.id {
            Some(id) => {
                let post = self
                    .posts
                    .iter_mut()
                    .find(|post| post.id == id)
                    .ok_or(PostError::NotFound(id))?;
                post.title = title.to_owned();
                post.content = draft.content;
                post.excerpt = excerpt;
                post.category_id = category_id;
                post.status = draft.status;
                post.updated_at = now.to_owned();
                id
            }
            None => {
                let id = self.posts.iter().map(|post| post.id).max().map_or(1, |max| max + 1);
                self.posts.insert(
                    0,
                    Post {
                        id,
                        title: title.to_owned(),
                        content: draft.content,
                        excerpt,
                        category_id,
                        status: draft.status,
                        created_at: now.to_owned(),
                        updated_at: now.to_owned(),
                    },
                );
                id
            }
        };
        self.editing = None;
        Ok(id)
    }

    /// Remove a post. Returns `true` if one was removed.
    pub fn delete(&mut self, id: u32) -> bool {
        let before = self.posts.len();
        self.posts.retain(|post| post.id != id);
        self.posts.len() != before
    }
}
