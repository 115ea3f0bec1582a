use super::item::ItemKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by `ItemStore` implementations and the SQLite bootstrap.
#[derive(Debug)]
pub enum StoreError {
    AlreadyExists { kind: ItemKind, id: String },
    NotFound { kind: ItemKind, id: String },
    InvalidIndex(String),
    InvalidData(String),
    Serialization(serde_json::Error),
    Sqlite(rusqlite::Error),
    /// The database was migrated by a newer build.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    /// Shared state is unusable, e.g. a poisoned lock or a failed blocking task.
    Internal(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyExists { kind, id } => write!(f, "{kind} already exists: {id}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found in store: {id}"),
            Self::InvalidIndex(index) => write!(f, "invalid secondary index name `{index}`"),
            Self::InvalidData(message) => write!(f, "invalid stored item data: {message}"),
            Self::Serialization(err) => write!(f, "item serialization failed: {err}"),
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "item store schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Internal(message) => write!(f, "store internal error: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialization(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::AlreadyExists { .. }
            | Self::NotFound { .. }
            | Self::InvalidIndex(_)
            | Self::InvalidData(_)
            | Self::UnsupportedSchemaVersion { .. }
            | Self::Internal(_) => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
