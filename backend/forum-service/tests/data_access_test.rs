//! Data-access layer properties against the in-memory store backend,
//! including the two latent consistency gaps the layer knowingly carries.

use forum_service::db::{post_repo, user_repo};
use forum_service::error::AppError;
use forum_service::models::SortOrder;
use serde_json::json;
use std::time::Duration;
use store_client::{MemoryStore, StoreBackend};

/// Creation timestamps are epoch milliseconds; spacing writes out keeps
/// time-based orderings deterministic.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(2)).await;
}

#[actix_rt::test]
async fn test_created_post_has_no_likes_or_comments() {
    let store = MemoryStore::new();
    let id = post_repo::create_post(&store, "alice", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();

    let post = post_repo::get_post(&store, &id).await.unwrap();
    assert_eq!(post.author, "alice");
    assert!(post.liked_by.is_empty());
    assert!(post.comments.is_empty());
}

#[actix_rt::test]
async fn test_get_post_tolerates_records_without_containers() {
    // Simulates a creation-adjacent read: the stored record has no likedBy
    // and no comments key at all.
    let store = MemoryStore::new();
    store
        .set(
            "posts/raw1",
            json!({
                "author": "alice",
                "title": "Eight Chars!",
                "content": "A".repeat(40),
                "createdOn": 1_700_000_000_000i64,
            }),
        )
        .await
        .unwrap();

    let post = post_repo::get_post(&store, "raw1").await.unwrap();
    assert!(post.liked_by.is_empty());
    assert!(post.comments.is_empty());
}

#[actix_rt::test]
async fn test_like_then_dislike_round_trip() {
    let store = MemoryStore::new();
    user_repo::create_user(&store, "alice", "uid-alice", "alice@example.com")
        .await
        .unwrap();
    let id = post_repo::create_post(&store, "bob", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();

    post_repo::like_post(&store, &id, "alice").await.unwrap();
    let post = post_repo::get_post(&store, &id).await.unwrap();
    assert_eq!(post.liked_by, vec!["alice"]);
    let alice = user_repo::get_user_by_handle(&store, "alice")
        .await
        .unwrap()
        .unwrap();
    assert!(alice.liked_posts.contains_key(&id));

    post_repo::dislike_post(&store, &id, "alice").await.unwrap();
    let post = post_repo::get_post(&store, &id).await.unwrap();
    assert!(post.liked_by.is_empty());
    let alice = user_repo::get_user_by_handle(&store, "alice")
        .await
        .unwrap()
        .unwrap();
    assert!(!alice.liked_posts.contains_key(&id));
}

#[actix_rt::test]
async fn test_most_liked_ordering_is_non_increasing() {
    let store = MemoryStore::new();
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(
            post_repo::create_post(&store, "alice", "Eight Chars!", &"A".repeat(40))
                .await
                .unwrap(),
        );
    }

    // 1, 0, and 2 likes respectively.
    post_repo::like_post(&store, &ids[0], "u1").await.unwrap();
    post_repo::like_post(&store, &ids[2], "u1").await.unwrap();
    post_repo::like_post(&store, &ids[2], "u2").await.unwrap();

    let posts = post_repo::list_posts(&store, "", SortOrder::MostLiked)
        .await
        .unwrap();
    assert_eq!(posts.len(), 3);
    for pair in posts.windows(2) {
        assert!(pair[0].liked_by.len() >= pair[1].liked_by.len());
    }
    assert_eq!(posts[0].id, ids[2]);
}

#[actix_rt::test]
async fn test_most_commented_ordering_is_non_increasing() {
    let store = MemoryStore::new();
    let quiet = post_repo::create_post(&store, "alice", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();
    let busy = post_repo::create_post(&store, "alice", "Other Title", &"B".repeat(40))
        .await
        .unwrap();
    post_repo::add_comment(&store, &busy, "bob", "hi").await.unwrap();
    post_repo::add_comment(&store, &busy, "bob", "ho").await.unwrap();

    let posts = post_repo::list_posts(&store, "", SortOrder::MostCommented)
        .await
        .unwrap();
    assert_eq!(posts[0].id, busy);
    assert_eq!(posts[1].id, quiet);
}

#[actix_rt::test]
async fn test_search_without_match_is_empty() {
    let store = MemoryStore::new();
    post_repo::create_post(&store, "alice", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();

    let posts = post_repo::list_posts(&store, "xyz", SortOrder::Newest)
        .await
        .unwrap();
    assert!(posts.is_empty());
}

#[actix_rt::test]
async fn test_search_is_case_insensitive_over_title_and_content() {
    let store = MemoryStore::new();
    let by_title = post_repo::create_post(&store, "alice", "Dragons Rise", &"A".repeat(40))
        .await
        .unwrap();
    let by_content = post_repo::create_post(
        &store,
        "bob",
        "Other Title",
        "Some long content about DRAGONS and more.",
    )
    .await
    .unwrap();
    post_repo::create_post(&store, "carol", "Unrelated!", &"B".repeat(40))
        .await
        .unwrap();

    let posts = post_repo::list_posts(&store, "dRaGoN", SortOrder::Oldest)
        .await
        .unwrap();
    let found: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(found, vec![by_title.as_str(), by_content.as_str()]);
}

#[actix_rt::test]
async fn test_newest_listing_leads_with_latest_post() {
    let store = MemoryStore::new();
    post_repo::create_post(&store, "bob", "Older One!", &"B".repeat(40))
        .await
        .unwrap();
    tick().await;
    let id = post_repo::create_post(&store, "alice", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();

    let posts = post_repo::list_posts(&store, "", SortOrder::Newest)
        .await
        .unwrap();
    assert_eq!(posts[0].id, id);

    let posts = post_repo::list_posts(&store, "", SortOrder::Oldest)
        .await
        .unwrap();
    assert_eq!(posts.last().unwrap().id, id);
}

#[actix_rt::test]
async fn test_comment_add_then_edit() {
    let store = MemoryStore::new();
    let post_id = post_repo::create_post(&store, "alice", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();

    let comment_id = post_repo::add_comment(&store, &post_id, "bob", "hi")
        .await
        .unwrap();
    post_repo::edit_comment(&store, &post_id, &comment_id, "hi there")
        .await
        .unwrap();

    let post = post_repo::get_post(&store, &post_id).await.unwrap();
    assert_eq!(post.comments.len(), 1);
    assert_eq!(post.comments[0].author, "bob");
    assert_eq!(post.comments[0].text, "hi there");
}

#[actix_rt::test]
async fn test_comments_keep_insertion_order() {
    let store = MemoryStore::new();
    let post_id = post_repo::create_post(&store, "alice", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();
    post_repo::add_comment(&store, &post_id, "bob", "first").await.unwrap();
    post_repo::add_comment(&store, &post_id, "carol", "second").await.unwrap();

    let post = post_repo::get_post(&store, &post_id).await.unwrap();
    let texts: Vec<&str> = post.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[actix_rt::test]
async fn test_delete_then_get_is_not_found() {
    let store = MemoryStore::new();
    let id = post_repo::create_post(&store, "alice", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();

    post_repo::delete_post(&store, &id).await.unwrap();
    let err = post_repo::get_post(&store, &id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_rt::test]
async fn test_update_post_patches_only_given_fields() {
    let store = MemoryStore::new();
    let id = post_repo::create_post(&store, "alice", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();

    post_repo::update_post(&store, &id, Some("Changed Title"), None)
        .await
        .unwrap();
    let post = post_repo::get_post(&store, &id).await.unwrap();
    assert_eq!(post.title, "Changed Title");
    assert_eq!(post.content, "A".repeat(40));
}

#[actix_rt::test]
async fn test_toggle_block_round_trip() {
    let store = MemoryStore::new();
    user_repo::create_user(&store, "carol", "uid-carol", "carol@example.com")
        .await
        .unwrap();

    user_repo::toggle_block(&store, "carol", false).await.unwrap();
    let users = user_repo::list_users(&store).await.unwrap();
    assert!(users["carol"].is_blocked);

    user_repo::toggle_block(&store, "carol", true).await.unwrap();
    let users = user_repo::list_users(&store).await.unwrap();
    assert!(!users["carol"].is_blocked);
}

#[actix_rt::test]
async fn test_set_admin_is_sticky() {
    let store = MemoryStore::new();
    user_repo::create_user(&store, "carol", "uid-carol", "carol@example.com")
        .await
        .unwrap();

    user_repo::set_admin(&store, "carol").await.unwrap();
    let carol = user_repo::get_user_by_handle(&store, "carol")
        .await
        .unwrap()
        .unwrap();
    assert!(carol.is_admin);
    // The flag update touches nothing else on the record.
    assert_eq!(carol.email, "carol@example.com");
    assert!(!carol.is_blocked);
}

#[actix_rt::test]
async fn test_find_user_by_uid() {
    let store = MemoryStore::new();
    user_repo::create_user(&store, "alice", "uid-alice", "alice@example.com")
        .await
        .unwrap();
    user_repo::create_user(&store, "bob", "uid-bob", "bob@example.com")
        .await
        .unwrap();

    let bob = user_repo::find_user_by_uid(&store, "uid-bob")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bob.handle, "bob");

    assert!(user_repo::find_user_by_uid(&store, "uid-nobody")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Latent gaps carried over from the data model, pinned so a future change is
// a conscious one.
// ---------------------------------------------------------------------------

#[actix_rt::test]
async fn test_edit_comment_without_existing_comment_writes_orphan_fragment() {
    let store = MemoryStore::new();
    let post_id = post_repo::create_post(&store, "alice", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();

    // No existence check: the edit "succeeds" and leaves a comment fragment
    // with only a text field behind.
    post_repo::edit_comment(&store, &post_id, "no-such-comment", "ghost")
        .await
        .unwrap();

    let fragment = store
        .get(&format!("posts/{}/comments/no-such-comment", post_id))
        .await
        .unwrap();
    assert_eq!(fragment, Some(json!({ "text": "ghost" })));

    let post = post_repo::get_post(&store, &post_id).await.unwrap();
    assert_eq!(post.comments.len(), 1);
    assert_eq!(post.comments[0].text, "ghost");
    assert_eq!(post.comments[0].author, "");
}

#[actix_rt::test]
async fn test_delete_post_leaves_liked_posts_mirror_behind() {
    let store = MemoryStore::new();
    user_repo::create_user(&store, "alice", "uid-alice", "alice@example.com")
        .await
        .unwrap();
    let id = post_repo::create_post(&store, "bob", "Eight Chars!", &"A".repeat(40))
        .await
        .unwrap();
    post_repo::like_post(&store, &id, "alice").await.unwrap();

    post_repo::delete_post(&store, &id).await.unwrap();

    // The post subtree is gone, but the mirrored entry under the user record
    // is not cascaded.
    assert!(matches!(
        post_repo::get_post(&store, &id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    let alice = user_repo::get_user_by_handle(&store, "alice")
        .await
        .unwrap()
        .unwrap();
    assert!(alice.liked_posts.contains_key(&id));
}
