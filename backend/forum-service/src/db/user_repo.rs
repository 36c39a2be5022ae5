//! User repository - all store operations for user records.

use crate::error::Result;
use crate::models::User;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use store_client::{StoreBackend, UpdateMap};

const USERS: &str = "users";

fn user_path(handle: &str) -> String {
    format!("users/{}", handle)
}

/// Create the user record keyed by handle. Handle uniqueness is the caller's
/// responsibility; two racing registrations are last-write-wins.
pub async fn create_user(
    store: &dyn StoreBackend,
    handle: &str,
    uid: &str,
    email: &str,
) -> Result<User> {
    let user = User {
        handle: handle.to_string(),
        uid: uid.to_string(),
        email: email.to_string(),
        created_on: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        is_admin: false,
        is_blocked: false,
        liked_posts: BTreeMap::new(),
    };

    store
        .set(&user_path(handle), serde_json::to_value(&user)?)
        .await?;
    Ok(user)
}

/// One-shot fetch by handle; used as the registration uniqueness probe.
pub async fn get_user_by_handle(store: &dyn StoreBackend, handle: &str) -> Result<Option<User>> {
    match store.get(&user_path(handle)).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Equality query on the `uid` child field. Zero-or-one matches expected
/// since uids are unique; extra matches would mean a corrupted tree and the
/// first one wins.
pub async fn find_user_by_uid(store: &dyn StoreBackend, uid: &str) -> Result<Option<User>> {
    let matches = store.query_equal(USERS, "uid", uid).await?;
    match matches.into_values().next() {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Flip the block flag relative to the state the caller observed.
pub async fn toggle_block(
    store: &dyn StoreBackend,
    handle: &str,
    currently_blocked: bool,
) -> Result<()> {
    let mut updates = UpdateMap::new();
    updates.insert("isBlocked".to_string(), json!(!currently_blocked));
    store.update(&user_path(handle), updates).await?;
    Ok(())
}

/// Grant admin rights. One-way; there is no revoke.
pub async fn set_admin(store: &dyn StoreBackend, handle: &str) -> Result<()> {
    let mut updates = UpdateMap::new();
    updates.insert("isAdmin".to_string(), json!(true));
    store.update(&user_path(handle), updates).await?;
    Ok(())
}

/// The whole users collection keyed by handle. No pagination.
pub async fn list_users(store: &dyn StoreBackend) -> Result<BTreeMap<String, User>> {
    let entries = match store.get(USERS).await? {
        Some(Value::Object(entries)) => entries,
        _ => return Ok(BTreeMap::new()),
    };

    let mut users = BTreeMap::new();
    for (handle, value) in entries {
        users.insert(handle, serde_json::from_value(value)?);
    }
    Ok(users)
}
