//! Robot domain model.
//!
//! # Responsibility
//! - Define the canonical robot record and its create/update payloads.
//! - Validate user-supplied fields before they reach a store.
//!
//! # Invariants
//! - `id` is stable and never reused for another robot.
//! - `user_id` and `listing_id` are fixed at creation; updates cannot carry them.
//! - `updated_at` is never earlier than `created_at`.

use super::timestamp::{now_epoch_secs, EpochSecs};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a robot.
pub type RobotId = Uuid;

/// Validation failures for robot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotValidationError {
    EmptyName,
    EmptyUserId,
    EmptyListingId,
}

impl Display for RobotValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "robot name must not be blank"),
            Self::EmptyUserId => write!(f, "robot user_id must not be blank"),
            Self::EmptyListingId => write!(f, "robot listing_id must not be blank"),
        }
    }
}

impl Error for RobotValidationError {}

/// Persisted robot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub id: RobotId,
    pub user_id: String,
    pub listing_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: EpochSecs,
    pub updated_at: EpochSecs,
}

impl Robot {
    /// Builds a robot from a create request with a freshly generated id.
    ///
    /// `created_at` and `updated_at` are set to the same instant.
    pub fn create(new_robot: NewRobot) -> Self {
        let now = now_epoch_secs();
        Self {
            id: Uuid::new_v4(),
            user_id: new_robot.user_id,
            listing_id: new_robot.listing_id,
            name: new_robot.name,
            description: new_robot.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks required fields.
    pub fn validate(&self) -> Result<(), RobotValidationError> {
        validate_required(&self.name, RobotValidationError::EmptyName)?;
        validate_required(&self.user_id, RobotValidationError::EmptyUserId)?;
        validate_required(&self.listing_id, RobotValidationError::EmptyListingId)
    }
}

/// Input for creating a robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRobot {
    pub listing_id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewRobot {
    pub fn new(
        user_id: impl Into<String>,
        listing_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            listing_id: listing_id.into(),
            user_id: user_id.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for a robot.
///
/// Only fields set to `Some` are written; everything else is left as stored.
/// Ownership fields are deliberately absent: a robot cannot be moved to
/// another user or listing through an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the stored description.
    pub description: Option<Option<String>>,
}

impl RobotUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn validate(&self) -> Result<(), RobotValidationError> {
        match &self.name {
            Some(name) => validate_required(name, RobotValidationError::EmptyName),
            None => Ok(()),
        }
    }
}

fn validate_required(value: &str, error: RobotValidationError) -> Result<(), RobotValidationError> {
    if value.trim().is_empty() {
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewRobot, Robot, RobotUpdate, RobotValidationError};

    #[test]
    fn create_stamps_equal_timestamps() {
        let robot = Robot::create(NewRobot::new("u1", "l1", "Arm"));
        assert_eq!(robot.created_at, robot.updated_at);
        assert!(!robot.id.is_nil());
    }

    #[test]
    fn blank_name_is_rejected() {
        let robot = Robot::create(NewRobot::new("u1", "l1", "   "));
        assert_eq!(robot.validate(), Err(RobotValidationError::EmptyName));

        let update = RobotUpdate::new().name("");
        assert_eq!(update.validate(), Err(RobotValidationError::EmptyName));
    }
}
