//! Robot data-access layer over a generic item store.
//! Robots are created under existing listings and queried by owner or listing.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::listing::Listing;
pub use model::robot::{NewRobot, Robot, RobotId, RobotUpdate, RobotValidationError};
pub use model::timestamp::{now_epoch_secs, EpochSecs};
pub use repo::robot_repo::{RepoError, RepoResult, RobotRepository};
pub use store::{
    Attributes, InMemoryItemStore, Item, ItemKind, ItemStore, SqliteItemStore, StoreError,
    StoreResult, StoredEntity,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
