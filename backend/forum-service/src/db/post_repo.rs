//! Post repository - all store operations for posts and their comments.

use crate::error::{AppError, Result};
use crate::models::{Comment, Post, PostView, SortOrder};
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use store_client::{StoreBackend, UpdateMap};

const POSTS: &str = "posts";

fn post_path(post_id: &str) -> String {
    format!("posts/{}", post_id)
}

fn comments_path(post_id: &str) -> String {
    format!("posts/{}/comments", post_id)
}

/// Append a new post with empty likes and comments; returns the generated id.
pub async fn create_post(
    store: &dyn StoreBackend,
    author: &str,
    title: &str,
    content: &str,
) -> Result<String> {
    let post = Post {
        author: author.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        created_on: Utc::now().timestamp_millis(),
        liked_by: BTreeMap::new(),
        comments: BTreeMap::new(),
    };

    let id = store.push(POSTS, serde_json::to_value(&post)?).await?;
    Ok(id)
}

/// Fetch the whole posts collection, filter by a case-insensitive substring
/// match against title OR content (empty search matches all), and order by
/// `sort`. Ties keep collection order (the sorts are stable). Full scan on
/// every call; fine at this collection size.
pub async fn list_posts(
    store: &dyn StoreBackend,
    search: &str,
    sort: SortOrder,
) -> Result<Vec<PostView>> {
    let entries = match store.get(POSTS).await? {
        Some(Value::Object(entries)) => entries,
        _ => return Ok(Vec::new()),
    };

    let needle = search.to_lowercase();
    let mut posts = Vec::with_capacity(entries.len());
    for (id, value) in entries {
        let post: Post = serde_json::from_value(value)?;
        let view = post.into_view(id);
        if needle.is_empty()
            || view.title.to_lowercase().contains(&needle)
            || view.content.to_lowercase().contains(&needle)
        {
            posts.push(view);
        }
    }

    sort_posts(&mut posts, sort);
    Ok(posts)
}

fn sort_posts(posts: &mut [PostView], sort: SortOrder) {
    match sort {
        SortOrder::Newest => posts.sort_by(|a, b| b.created_on.cmp(&a.created_on)),
        SortOrder::Oldest => posts.sort_by(|a, b| a.created_on.cmp(&b.created_on)),
        SortOrder::MostLiked => posts.sort_by(|a, b| b.liked_by.len().cmp(&a.liked_by.len())),
        SortOrder::MostCommented => posts.sort_by(|a, b| b.comments.len().cmp(&a.comments.len())),
    }
}

/// Fetch a single post by id; NotFound when the id does not exist.
pub async fn get_post(store: &dyn StoreBackend, post_id: &str) -> Result<PostView> {
    let value = store
        .get(&post_path(post_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} does not exist", post_id)))?;
    let post: Post = serde_json::from_value(value)?;
    Ok(post.into_view(post_id.to_string()))
}

/// Record a like in both mirrored locations with ONE multi-path update, which
/// the store applies atomically. Idempotent at the data level; redundant
/// calls are the caller's concern.
pub async fn like_post(store: &dyn StoreBackend, post_id: &str, handle: &str) -> Result<()> {
    let mut updates = UpdateMap::new();
    updates.insert(format!("posts/{}/likedBy/{}", post_id, handle), json!(true));
    updates.insert(format!("users/{}/likedPosts/{}", handle, post_id), json!(true));
    store.update("", updates).await?;
    Ok(())
}

/// Remove a like from both mirrored locations, same single-update contract as
/// [`like_post`].
pub async fn dislike_post(store: &dyn StoreBackend, post_id: &str, handle: &str) -> Result<()> {
    let mut updates = UpdateMap::new();
    updates.insert(format!("posts/{}/likedBy/{}", post_id, handle), Value::Null);
    updates.insert(format!("users/{}/likedPosts/{}", handle, post_id), Value::Null);
    store.update("", updates).await?;
    Ok(())
}

/// Append a comment under the post; returns the generated comment id.
pub async fn add_comment(
    store: &dyn StoreBackend,
    post_id: &str,
    author: &str,
    text: &str,
) -> Result<String> {
    let comment = Comment {
        author: author.to_string(),
        text: text.to_string(),
        created_on: Utc::now().timestamp_millis(),
    };

    let id = store
        .push(&comments_path(post_id), serde_json::to_value(&comment)?)
        .await?;
    Ok(id)
}

/// Partial update of a single comment's `text`. No existence check: a missing
/// comment id writes an orphaned `{text}` fragment instead of failing.
pub async fn edit_comment(
    store: &dyn StoreBackend,
    post_id: &str,
    comment_id: &str,
    new_text: &str,
) -> Result<()> {
    let mut updates = UpdateMap::new();
    updates.insert("text".to_string(), json!(new_text));
    store
        .update(&format!("{}/{}", comments_path(post_id), comment_id), updates)
        .await?;
    Ok(())
}

/// Partial update of a post's title and/or content.
pub async fn update_post(
    store: &dyn StoreBackend,
    post_id: &str,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<()> {
    let mut updates = UpdateMap::new();
    if let Some(title) = title {
        updates.insert("title".to_string(), json!(title));
    }
    if let Some(content) = content {
        updates.insert("content".to_string(), json!(content));
    }
    if updates.is_empty() {
        return Ok(());
    }
    store.update(&post_path(post_id), updates).await?;
    Ok(())
}

/// Remove the post subtree, comments and like records included. Mirrored
/// `users/*/likedPosts` entries are NOT cascaded.
pub async fn delete_post(store: &dyn StoreBackend, post_id: &str) -> Result<()> {
    store.remove(&post_path(post_id)).await?;
    Ok(())
}
