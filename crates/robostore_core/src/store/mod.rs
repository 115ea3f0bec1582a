//! Generic item-store contract and its implementations.
//!
//! # Responsibility
//! - Define the narrow `ItemStore` capability repositories depend on.
//! - Provide an in-memory store and a SQLite-backed store.
//!
//! # Invariants
//! - Items are keyed by `(kind, id)`; the same id may exist under two kinds.
//! - `add_item` never overwrites; `delete_item` never fails on a missing key.
//! - Secondary indexes are equality lookups on top-level string attributes.

mod error;
mod item;
mod memory;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use item::{Attributes, Item, ItemKind, StoredEntity};
pub use memory::InMemoryItemStore;
pub use sqlite::SqliteItemStore;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Secondary index over `Robot::user_id`.
pub const USER_ID_INDEX: &str = "user_id";
/// Secondary index over `Robot::listing_id`.
pub const LISTING_ID_INDEX: &str = "listing_id";

static INDEX_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").expect("valid index name regex")
});

/// Storage capability used by repositories.
///
/// All methods are async; implementations guard their own state and never
/// hold a lock across an await point.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Point lookup by primary key and type tag.
    async fn get_item(&self, id: &str, kind: ItemKind) -> StoreResult<Option<Item>>;

    /// Inserts a new item.
    ///
    /// Fails with `StoreError::AlreadyExists` when the key is taken.
    async fn add_item(&self, item: &Item) -> StoreResult<()>;

    /// Merges `fields` into the stored attributes of an existing item.
    ///
    /// Attributes not present in `fields` are left untouched. Fails with
    /// `StoreError::NotFound` when the key is absent.
    async fn update_item(&self, id: &str, kind: ItemKind, fields: &Attributes) -> StoreResult<()>;

    /// Removes an item by key. Removing a missing item is a no-op.
    async fn delete_item(&self, item: &Item) -> StoreResult<()>;

    /// Returns every item of `kind` whose `index` attribute equals `value`.
    async fn get_items_by_secondary_index(
        &self,
        index: &str,
        value: &str,
        kind: ItemKind,
    ) -> StoreResult<Vec<Item>>;
}

#[async_trait]
impl<T: ItemStore + ?Sized> ItemStore for Arc<T> {
    async fn get_item(&self, id: &str, kind: ItemKind) -> StoreResult<Option<Item>> {
        (**self).get_item(id, kind).await
    }

    async fn add_item(&self, item: &Item) -> StoreResult<()> {
        (**self).add_item(item).await
    }

    async fn update_item(&self, id: &str, kind: ItemKind, fields: &Attributes) -> StoreResult<()> {
        (**self).update_item(id, kind, fields).await
    }

    async fn delete_item(&self, item: &Item) -> StoreResult<()> {
        (**self).delete_item(item).await
    }

    async fn get_items_by_secondary_index(
        &self,
        index: &str,
        value: &str,
        kind: ItemKind,
    ) -> StoreResult<Vec<Item>> {
        (**self).get_items_by_secondary_index(index, value, kind).await
    }
}

/// Rejects index names that are not plain identifiers.
///
/// The SQLite store splices the name into a JSON path, so this check is part
/// of the contract for every implementation.
pub(crate) fn validate_index_name(index: &str) -> StoreResult<()> {
    if INDEX_NAME_RE.is_match(index) {
        return Ok(());
    }
    Err(StoreError::InvalidIndex(index.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{validate_index_name, StoreError};

    #[test]
    fn index_names_must_be_identifiers() {
        assert!(validate_index_name("user_id").is_ok());
        assert!(validate_index_name("listingId").is_ok());
        assert!(matches!(
            validate_index_name("user_id') OR 1=1 --"),
            Err(StoreError::InvalidIndex(_))
        ));
        assert!(validate_index_name("").is_err());
        assert!(validate_index_name("9lives").is_err());
    }
}
