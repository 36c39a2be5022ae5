//! Typed records for the remote tree and their denormalized API shapes.
//!
//! Wire names are camelCase to match what the store actually holds. The store
//! never persists empty containers, so every container field tolerates being
//! absent on read and is skipped when empty on write.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User record stored at `users/{handle}`. The handle doubles as the key and
/// is the primary key for all user-related data; `uid` is the identity
/// provider's id, kept for session resolution only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub handle: String,
    pub uid: String,
    pub email: String,
    /// RFC 3339 timestamp string.
    pub created_on: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_blocked: bool,
    /// Mirror of `Post.likedBy`, keyed by post id for O(1) membership.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub liked_posts: BTreeMap<String, bool>,
}

/// Post record stored at `posts/{id}`; the id is the push key and lives only
/// in the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// The author's handle, denormalized at creation time. A later handle
    /// change would orphan this copy; no cascade exists.
    pub author: String,
    pub title: String,
    pub content: String,
    /// Epoch milliseconds.
    pub created_on: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub liked_by: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub comments: BTreeMap<String, Comment>,
}

/// Comment owned by its parent post, keyed by push key under
/// `posts/{id}/comments`. Every field defaults: a blind partial update can
/// leave a fragment with only `text`, and reads must still serve the post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub author: String,
    pub text: String,
    /// Epoch milliseconds.
    pub created_on: i64,
}

/// A post as served to clients: maps denormalized into lists, id pulled out
/// of the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub created_on: i64,
    pub liked_by: Vec<String>,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub author: String,
    pub text: String,
    pub created_on: i64,
}

impl Post {
    /// Denormalize into the served shape. Push keys sort chronologically, so
    /// iterating the maps in key order keeps likes and comments in the order
    /// they arrived.
    pub fn into_view(self, id: String) -> PostView {
        PostView {
            id,
            author: self.author,
            title: self.title,
            content: self.content,
            created_on: self.created_on,
            liked_by: self.liked_by.into_keys().collect(),
            comments: self
                .comments
                .into_iter()
                .map(|(comment_id, comment)| CommentView {
                    id: comment_id,
                    author: comment.author,
                    text: comment.text,
                    created_on: comment.created_on,
                })
                .collect(),
        }
    }
}

/// Sort orders for the post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "desc", alias = "newest")]
    Newest,
    #[serde(rename = "asc", alias = "oldest")]
    Oldest,
    #[serde(rename = "mostLiked")]
    MostLiked,
    #[serde(rename = "mostCommented")]
    MostCommented,
}
