//! SQLite-backed `ItemStore`.
//!
//! # Responsibility
//! - Persist items as JSON attribute documents in the `items` table.
//! - Serve secondary-index lookups through `json_extract`.
//!
//! # Invariants
//! - The connection is migrated before the store accepts calls.
//! - Every rusqlite call runs on the blocking pool, never on an executor thread.
//! - Partial updates read, merge and write back inside one transaction.

use super::error::{StoreError, StoreResult};
use super::item::{Attributes, Item, ItemKind};
use super::{validate_index_name, ItemStore};
use crate::db::{open_db, open_db_in_memory};
use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Durable item store over a single SQLite connection.
///
/// Calls are serialized through a mutex and executed with
/// `tokio::task::spawn_blocking`, so a busy database only stalls the
/// blocking pool. Methods must be awaited inside a Tokio runtime.
#[derive(Clone)]
pub struct SqliteItemStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteItemStore {
    /// Wraps an already migrated connection (see `crate::db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (or creates) a database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Internal("sqlite connection lock poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|err| StoreError::Internal(format!("sqlite {operation} task failed: {err}")))?
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn get_item(&self, id: &str, kind: ItemKind) -> StoreResult<Option<Item>> {
        let id = id.to_string();
        self.with_conn("get_item", move |conn| {
            let attributes = conn
                .query_row(
                    "SELECT attributes FROM items WHERE kind = ?1 AND id = ?2;",
                    params![kind.as_str(), id],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;

            match attributes {
                Some(text) => {
                    let attributes = parse_attributes(&text, kind, &id)?;
                    Ok(Some(Item {
                        id,
                        kind,
                        attributes,
                    }))
                }
                None => Ok(None),
            }
        })
        .await
    }

    async fn add_item(&self, item: &Item) -> StoreResult<()> {
        let body = serde_json::to_string(&item.attributes)?;
        let (id, kind) = (item.id.clone(), item.kind);
        self.with_conn("add_item", move |conn| {
            let inserted = conn.execute(
                "INSERT INTO items (kind, id, attributes) VALUES (?1, ?2, ?3);",
                params![kind.as_str(), id, body],
            );

            match inserted {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::AlreadyExists { kind, id })
                }
                Err(err) => Err(err.into()),
            }
        })
        .await
    }

    async fn update_item(&self, id: &str, kind: ItemKind, fields: &Attributes) -> StoreResult<()> {
        let id = id.to_string();
        let fields = fields.clone();
        self.with_conn("update_item", move |conn| {
            let tx = conn.transaction()?;

            let current = tx
                .query_row(
                    "SELECT attributes FROM items WHERE kind = ?1 AND id = ?2;",
                    params![kind.as_str(), id],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            let Some(text) = current else {
                return Err(StoreError::NotFound { kind, id });
            };

            let mut attributes = parse_attributes(&text, kind, &id)?;
            attributes.extend(fields);

            tx.execute(
                "UPDATE items SET attributes = ?1 WHERE kind = ?2 AND id = ?3;",
                params![serde_json::to_string(&attributes)?, kind.as_str(), id],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete_item(&self, item: &Item) -> StoreResult<()> {
        let (id, kind) = (item.id.clone(), item.kind);
        self.with_conn("delete_item", move |conn| {
            conn.execute(
                "DELETE FROM items WHERE kind = ?1 AND id = ?2;",
                params![kind.as_str(), id],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_items_by_secondary_index(
        &self,
        index: &str,
        value: &str,
        kind: ItemKind,
    ) -> StoreResult<Vec<Item>> {
        validate_index_name(index)?;

        // The JSON path is spliced in so the expression matches the
        // `idx_items_*` expression indexes.
        let sql = format!(
            "SELECT id, attributes FROM items
             WHERE kind = ?1 AND json_extract(attributes, '$.{index}') = ?2
             ORDER BY id ASC;"
        );
        let value = value.to_string();

        self.with_conn("get_items_by_secondary_index", move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params![kind.as_str(), value])?;
            let mut items = Vec::new();

            while let Some(row) = rows.next()? {
                items.push(parse_item_row(row, kind)?);
            }

            Ok(items)
        })
        .await
    }
}

fn parse_item_row(row: &Row<'_>, kind: ItemKind) -> StoreResult<Item> {
    let id: String = row.get("id")?;
    let text: String = row.get("attributes")?;
    let attributes = parse_attributes(&text, kind, &id)?;
    Ok(Item {
        id,
        kind,
        attributes,
    })
}

fn parse_attributes(text: &str, kind: ItemKind, id: &str) -> StoreResult<Attributes> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(attributes) => Ok(attributes),
        _ => Err(StoreError::InvalidData(format!(
            "attributes of {kind} `{id}` are not a JSON object"
        ))),
    }
}
