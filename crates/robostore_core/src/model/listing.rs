//! Listing model.
//!
//! Listings are owned by another part of the system. The robot repository
//! only checks that one exists before attaching a robot to it.

use super::timestamp::{now_epoch_secs, EpochSecs};
use serde::{Deserialize, Serialize};

/// Parent record a robot must reference at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: EpochSecs,
}

impl Listing {
    /// Creates a listing with a caller-provided id, stamped with the current time.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            created_at: now_epoch_secs(),
        }
    }
}
