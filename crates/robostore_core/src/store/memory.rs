//! In-memory `ItemStore`.
//!
//! Backs tests and embedded callers that do not need durability. Clones share
//! the same underlying map.

use super::error::{StoreError, StoreResult};
use super::item::{Attributes, Item, ItemKind};
use super::{validate_index_name, ItemStore};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

type ItemMap = HashMap<(ItemKind, String), Item>;

/// Thread-safe map of items keyed by `(kind, id)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryItemStore {
    items: Arc<RwLock<ItemMap>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful mutating calls (add, update, delete).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of stored items of `kind`.
    pub fn count(&self, kind: ItemKind) -> StoreResult<usize> {
        let items = self.read()?;
        Ok(items.keys().filter(|(item_kind, _)| *item_kind == kind).count())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, ItemMap>> {
        self.items
            .read()
            .map_err(|_| StoreError::Internal("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, ItemMap>> {
        self.items
            .write()
            .map_err(|_| StoreError::Internal("in-memory store lock poisoned".to_string()))
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn get_item(&self, id: &str, kind: ItemKind) -> StoreResult<Option<Item>> {
        let items = self.read()?;
        Ok(items.get(&(kind, id.to_string())).cloned())
    }

    async fn add_item(&self, item: &Item) -> StoreResult<()> {
        {
            let mut items = self.write()?;
            let key = (item.kind, item.id.clone());
            if items.contains_key(&key) {
                return Err(StoreError::AlreadyExists {
                    kind: item.kind,
                    id: item.id.clone(),
                });
            }
            items.insert(key, item.clone());
        }
        self.record_write();
        Ok(())
    }

    async fn update_item(&self, id: &str, kind: ItemKind, fields: &Attributes) -> StoreResult<()> {
        {
            let mut items = self.write()?;
            let Some(stored) = items.get_mut(&(kind, id.to_string())) else {
                return Err(StoreError::NotFound {
                    kind,
                    id: id.to_string(),
                });
            };
            for (name, value) in fields {
                stored.attributes.insert(name.clone(), value.clone());
            }
        }
        self.record_write();
        Ok(())
    }

    async fn delete_item(&self, item: &Item) -> StoreResult<()> {
        self.write()?.remove(&(item.kind, item.id.clone()));
        self.record_write();
        Ok(())
    }

    async fn get_items_by_secondary_index(
        &self,
        index: &str,
        value: &str,
        kind: ItemKind,
    ) -> StoreResult<Vec<Item>> {
        validate_index_name(index)?;

        let items = self.read()?;
        let mut matches = items
            .values()
            .filter(|item| item.kind == kind)
            .filter(|item| matches!(item.attributes.get(index), Some(Value::String(v)) if v == value))
            .cloned()
            .collect::<Vec<_>>();
        matches.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(matches)
    }
}
