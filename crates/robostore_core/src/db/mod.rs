//! SQLite bootstrap for the durable item store.
//!
//! Connections returned from here have the `items` schema applied; the
//! schema version lives in `PRAGMA user_version`.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
