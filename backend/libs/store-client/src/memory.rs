//! In-process backend with the hosted store's tree semantics, used by tests
//! and local development. Writes of `null` (or containers that compact down
//! to nothing) delete, and emptied containers are pruned so readers never
//! observe an empty object.

use crate::push_id::PushIdGenerator;
use crate::{StoreBackend, StoreError, UpdateMap};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    root: RwLock<Value>,
    keys: PushIdGenerator,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Value::Null),
            keys: PushIdGenerator::new(),
        }
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Drop `null` children and empty containers, returning `Value::Null` when
/// nothing remains. The store persists no empty objects.
fn compact(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let compacted: Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, child)| {
                    let child = compact(child);
                    if child.is_null() {
                        None
                    } else {
                        Some((key, child))
                    }
                })
                .collect();
            if compacted.is_empty() {
                Value::Null
            } else {
                Value::Object(compacted)
            }
        }
        other => other,
    }
}

fn read<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in segments(path) {
        node = node.as_object()?.get(segment)?;
    }
    if node.is_null() {
        None
    } else {
        Some(node)
    }
}

fn write(root: &mut Value, path: &str, value: Value) {
    let value = compact(value);
    let segs = segments(path);
    if value.is_null() {
        delete(root, &segs);
        return;
    }
    if segs.is_empty() {
        *root = value;
        return;
    }
    let mut node = root;
    for segment in &segs[..segs.len() - 1] {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = node
            .as_object_mut()
            .unwrap()
            .entry(segment.to_string())
            .or_insert(Value::Null);
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    node.as_object_mut()
        .unwrap()
        .insert(segs[segs.len() - 1].to_string(), value);
}

/// Remove the subtree at `segs`, pruning containers emptied on the way back
/// up. Returns true when `node` itself became empty.
fn delete(node: &mut Value, segs: &[&str]) -> bool {
    if segs.is_empty() {
        *node = Value::Null;
        return true;
    }
    if let Some(map) = node.as_object_mut() {
        if let Some(child) = map.get_mut(segs[0]) {
            if delete(child, &segs[1..]) {
                map.remove(segs[0]);
            }
        }
        if map.is_empty() {
            *node = Value::Null;
            return true;
        }
        return false;
    }
    node.is_null()
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let root = self.root.read().unwrap();
        Ok(read(&root, path).cloned())
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let mut root = self.root.write().unwrap();
        write(&mut root, path, value);
        Ok(())
    }

    async fn update(&self, path: &str, updates: UpdateMap) -> Result<(), StoreError> {
        // One lock across the whole mapping: all entries land together.
        let mut root = self.root.write().unwrap();
        for (relative, value) in updates {
            let full = if path.is_empty() {
                relative
            } else {
                format!("{}/{}", path.trim_matches('/'), relative)
            };
            write(&mut root, &full, value);
        }
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> Result<String, StoreError> {
        let key = self.keys.generate();
        let mut root = self.root.write().unwrap();
        write(&mut root, &format!("{}/{}", path.trim_matches('/'), key), value);
        Ok(key)
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        let mut root = self.root.write().unwrap();
        let segs = segments(path);
        delete(&mut root, &segs);
        Ok(())
    }

    async fn query_equal(
        &self,
        path: &str,
        child: &str,
        value: &str,
    ) -> Result<BTreeMap<String, Value>, StoreError> {
        let root = self.root.read().unwrap();
        let mut matches = BTreeMap::new();
        if let Some(collection) = read(&root, path).and_then(Value::as_object) {
            for (key, entry) in collection {
                if entry.get(child).and_then(Value::as_str) == Some(value) {
                    matches.insert(key.clone(), entry.clone());
                }
            }
        }
        Ok(matches)
    }
}
