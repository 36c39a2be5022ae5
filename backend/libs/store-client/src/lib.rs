//! Client for the hosted JSON-tree document store.
//!
//! The store holds one JSON tree addressed by slash-delimited paths
//! (`posts/{id}/likedBy/{handle}`). All operations are one-shot round trips;
//! there are no subscriptions and no retries. Two backends implement the same
//! contract: [`RestStore`] speaks the hosted service's REST dialect and
//! [`MemoryStore`] keeps the tree in process for tests and local runs.

mod error;
mod memory;
mod push_id;
mod rest;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// Writes applied together by [`StoreBackend::update`], keyed by path relative
/// to the update root. `Value::Null` deletes the key, per the wire contract.
pub type UpdateMap = BTreeMap<String, Value>;

/// Path-addressed operations over the remote JSON tree.
///
/// The store never distinguishes "empty" from "absent": deleting the last
/// child of a container deletes the container, and readers see `None` rather
/// than an empty object.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// One-shot read of the subtree at `path`. `None` when nothing is stored
    /// there.
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrite the subtree at `path` with `value`.
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Apply every write in `updates` (paths relative to `path`) together.
    /// The store commits the whole mapping atomically; `Value::Null` entries
    /// delete their key.
    async fn update(&self, path: &str, updates: UpdateMap) -> Result<(), StoreError>;

    /// Append `value` under `path` with a generated child key; returns the
    /// key. Keys sort chronologically.
    async fn push(&self, path: &str, value: Value) -> Result<String, StoreError>;

    /// Delete the subtree at `path`. Deleting an absent path is a no-op.
    async fn remove(&self, path: &str) -> Result<(), StoreError>;

    /// Children of the collection at `path` whose `child` field equals
    /// `value`. Returns the (possibly empty) matching children keyed by their
    /// child key.
    async fn query_equal(
        &self,
        path: &str,
        child: &str,
        value: &str,
    ) -> Result<BTreeMap<String, Value>, StoreError>;
}
