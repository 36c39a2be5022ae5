//! Post service - validation and authorization for post operations.

use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{PostView, SortOrder};
use std::sync::Arc;
use store_client::StoreBackend;

/// Bounds enforced before any write reaches the store.
pub const TITLE_MIN: usize = 8;
pub const TITLE_MAX: usize = 64;
pub const CONTENT_MIN: usize = 32;
pub const CONTENT_MAX: usize = 8192;

pub struct PostService {
    store: Arc<dyn StoreBackend>,
}

impl PostService {
    pub fn new(store: Arc<dyn StoreBackend>) -> Self {
        Self { store }
    }

    /// Create a post authored by the session user; returns the new id.
    pub async fn create_post(
        &self,
        user: &CurrentUser,
        title: &str,
        content: &str,
    ) -> Result<String> {
        ensure_not_blocked(user)?;
        validate_title(title)?;
        validate_content(content)?;
        post_repo::create_post(self.store.as_ref(), &user.handle, title, content).await
    }

    pub async fn list_posts(&self, search: &str, sort: SortOrder) -> Result<Vec<PostView>> {
        post_repo::list_posts(self.store.as_ref(), search, sort).await
    }

    /// The session user's own posts, newest first.
    pub async fn my_posts(&self, user: &CurrentUser) -> Result<Vec<PostView>> {
        let posts = post_repo::list_posts(self.store.as_ref(), "", SortOrder::Newest).await?;
        Ok(posts
            .into_iter()
            .filter(|post| post.author == user.handle)
            .collect())
    }

    pub async fn get_post(&self, post_id: &str) -> Result<PostView> {
        post_repo::get_post(self.store.as_ref(), post_id).await
    }

    /// Like on behalf of the session user. Already-liked is a no-op here, so
    /// the repo stays unguarded.
    pub async fn like_post(&self, user: &CurrentUser, post_id: &str) -> Result<()> {
        let post = post_repo::get_post(self.store.as_ref(), post_id).await?;
        if post.liked_by.iter().any(|handle| handle == &user.handle) {
            return Ok(());
        }
        post_repo::like_post(self.store.as_ref(), post_id, &user.handle).await
    }

    /// Withdraw a like; not-currently-liked is a no-op.
    pub async fn dislike_post(&self, user: &CurrentUser, post_id: &str) -> Result<()> {
        let post = post_repo::get_post(self.store.as_ref(), post_id).await?;
        if !post.liked_by.iter().any(|handle| handle == &user.handle) {
            return Ok(());
        }
        post_repo::dislike_post(self.store.as_ref(), post_id, &user.handle).await
    }

    /// Add a comment authored by the session user; returns the comment id.
    pub async fn add_comment(
        &self,
        user: &CurrentUser,
        post_id: &str,
        text: &str,
    ) -> Result<String> {
        ensure_not_blocked(user)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("comment text must not be empty".into()));
        }
        post_repo::get_post(self.store.as_ref(), post_id).await?;
        post_repo::add_comment(self.store.as_ref(), post_id, &user.handle, text).await
    }

    /// Edit a comment's text. Authorship is enforced when the comment exists;
    /// a missing comment id falls through to the repo's blind update and
    /// writes an orphaned fragment (latent gap, pinned by tests).
    pub async fn edit_comment(
        &self,
        user: &CurrentUser,
        post_id: &str,
        comment_id: &str,
        new_text: &str,
    ) -> Result<()> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(AppError::Validation("comment text must not be empty".into()));
        }

        let post = post_repo::get_post(self.store.as_ref(), post_id).await?;
        if let Some(comment) = post.comments.iter().find(|c| c.id == comment_id) {
            if comment.author != user.handle {
                return Err(AppError::Unauthorized(
                    "only the comment author may edit it".into(),
                ));
            }
        }
        post_repo::edit_comment(self.store.as_ref(), post_id, comment_id, new_text).await
    }

    /// Partial update of title/content, by the author or an admin.
    pub async fn update_post(
        &self,
        user: &CurrentUser,
        post_id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<()> {
        let post = post_repo::get_post(self.store.as_ref(), post_id).await?;
        ensure_author_or_admin(user, &post.author)?;
        if let Some(title) = title {
            validate_title(title)?;
        }
        if let Some(content) = content {
            validate_content(content)?;
        }
        post_repo::update_post(self.store.as_ref(), post_id, title, content).await
    }

    /// Delete the post subtree, by the author or an admin.
    pub async fn delete_post(&self, user: &CurrentUser, post_id: &str) -> Result<()> {
        let post = post_repo::get_post(self.store.as_ref(), post_id).await?;
        ensure_author_or_admin(user, &post.author)?;
        post_repo::delete_post(self.store.as_ref(), post_id).await
    }
}

fn ensure_not_blocked(user: &CurrentUser) -> Result<()> {
    if user.is_blocked {
        return Err(AppError::Unauthorized("blocked accounts cannot publish".into()));
    }
    Ok(())
}

fn ensure_author_or_admin(user: &CurrentUser, author: &str) -> Result<()> {
    if user.handle == author || user.is_admin {
        return Ok(());
    }
    Err(AppError::Unauthorized(
        "only the author or an admin may modify this post".into(),
    ))
}

fn validate_title(title: &str) -> Result<()> {
    let length = title.chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&length) {
        return Err(AppError::Validation(format!(
            "title must be between {} and {} characters",
            TITLE_MIN, TITLE_MAX
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    let length = content.chars().count();
    if !(CONTENT_MIN..=CONTENT_MAX).contains(&length) {
        return Err(AppError::Validation(format!(
            "content must be between {} and {} characters",
            CONTENT_MIN, CONTENT_MAX
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(handle: &str, is_admin: bool, is_blocked: bool) -> CurrentUser {
        CurrentUser {
            handle: handle.to_string(),
            uid: format!("uid-{}", handle),
            email: format!("{}@example.com", handle),
            is_admin,
            is_blocked,
        }
    }

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("1234567").is_err());
        assert!(validate_title("12345678").is_ok());
        assert!(validate_title(&"x".repeat(64)).is_ok());
        assert!(validate_title(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_content_bounds() {
        assert!(validate_content(&"x".repeat(31)).is_err());
        assert!(validate_content(&"x".repeat(32)).is_ok());
        assert!(validate_content(&"x".repeat(8192)).is_ok());
        assert!(validate_content(&"x".repeat(8193)).is_err());
    }

    #[test]
    fn test_author_or_admin_guard() {
        assert!(ensure_author_or_admin(&user("alice", false, false), "alice").is_ok());
        assert!(ensure_author_or_admin(&user("admin", true, false), "alice").is_ok());
        assert!(ensure_author_or_admin(&user("bob", false, false), "alice").is_err());
    }

    #[test]
    fn test_blocked_guard() {
        assert!(ensure_not_blocked(&user("alice", false, false)).is_ok());
        assert!(ensure_not_blocked(&user("alice", false, true)).is_err());
    }
}
