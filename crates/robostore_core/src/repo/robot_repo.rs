//! Robot repository over a generic item store.
//!
//! # Responsibility
//! - Provide CRUD and secondary-index queries for robots.
//! - Check that the parent listing exists before a robot is created.
//!
//! # Invariants
//! - Writes validate robot fields before touching the store.
//! - A failed listing check performs no write.
//! - `updated_at` never moves backwards across updates.

use crate::model::robot::{NewRobot, Robot, RobotId, RobotUpdate, RobotValidationError};
use crate::model::timestamp::{now_epoch_secs, EpochSecs};
use crate::store::{
    Attributes, ItemKind, ItemStore, StoreError, StoredEntity, LISTING_ID_INDEX, USER_ID_INDEX,
};
use log::{debug, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for robot operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RobotValidationError),
    /// The referenced listing or requested robot does not exist.
    NotFound { kind: ItemKind, id: String },
    /// Store failures, passed through unchanged.
    Store(StoreError),
}

impl RepoError {
    fn not_found(kind: ItemKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RobotValidationError> for RepoError {
    fn from(value: RobotValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// CRUD access to robots backed by any `ItemStore`.
pub struct RobotRepository<S: ItemStore> {
    store: S,
}

impl<S: ItemStore> RobotRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a robot under an existing listing.
    ///
    /// # Errors
    /// - `RepoError::Validation` for blank name or ids.
    /// - `RepoError::NotFound` naming the listing id when it does not exist.
    pub async fn create(&self, new_robot: NewRobot) -> RepoResult<Robot> {
        let robot = Robot::create(new_robot);
        robot.validate()?;

        let listing = self
            .store
            .get_item(&robot.listing_id, ItemKind::Listing)
            .await?;
        if listing.is_none() {
            warn!(
                "event=robot_create module=repo status=error error_code=listing_not_found listing_id={}",
                robot.listing_id
            );
            return Err(RepoError::not_found(ItemKind::Listing, robot.listing_id));
        }

        self.store.add_item(&robot.to_item()?).await?;
        info!(
            "event=robot_create module=repo status=ok robot_id={} listing_id={}",
            robot.id, robot.listing_id
        );
        Ok(robot)
    }

    /// Gets one robot by id.
    pub async fn get(&self, id: RobotId) -> RepoResult<Robot> {
        let key = id.to_string();
        match self.store.get_item(&key, ItemKind::Robot).await? {
            Some(item) => Ok(Robot::from_item(item)?),
            None => Err(RepoError::not_found(ItemKind::Robot, key)),
        }
    }

    /// Lists every robot owned by `user_id`. Empty when none match.
    pub async fn list_by_user(&self, user_id: &str) -> RepoResult<Vec<Robot>> {
        self.list_by_index(USER_ID_INDEX, user_id).await
    }

    /// Lists every robot attached to `listing_id`. Empty when none match.
    pub async fn list_by_listing(&self, listing_id: &str) -> RepoResult<Vec<Robot>> {
        self.list_by_index(LISTING_ID_INDEX, listing_id).await
    }

    /// Applies a partial update and returns the refreshed robot.
    ///
    /// Fields absent from `update` keep their stored values. `updated_at` is
    /// set to the current time, or kept when the clock reads earlier.
    pub async fn update(&self, id: RobotId, update: RobotUpdate) -> RepoResult<Robot> {
        update.validate()?;
        let current = self.get(id).await?;

        let updated_at = now_epoch_secs().max(current.updated_at);
        let fields = update_fields(update, updated_at);
        self.store
            .update_item(&current.item_id(), ItemKind::Robot, &fields)
            .await
            .map_err(|err| match err {
                // Deleted after the existence check above.
                StoreError::NotFound {
                    kind: ItemKind::Robot,
                    id,
                } => RepoError::not_found(ItemKind::Robot, id),
                other => RepoError::Store(other),
            })?;

        let refreshed = self.get(id).await?;
        info!(
            "event=robot_update module=repo status=ok robot_id={} fields={}",
            id,
            fields.len()
        );
        Ok(refreshed)
    }

    /// Deletes a robot. Deleting an already removed robot is not an error.
    pub async fn delete(&self, robot: &Robot) -> RepoResult<()> {
        self.store.delete_item(&robot.to_item()?).await?;
        info!("event=robot_delete module=repo status=ok robot_id={}", robot.id);
        Ok(())
    }

    async fn list_by_index(&self, index: &str, value: &str) -> RepoResult<Vec<Robot>> {
        let items = self
            .store
            .get_items_by_secondary_index(index, value, ItemKind::Robot)
            .await?;
        debug!(
            "event=robot_list module=repo status=ok index={} count={}",
            index,
            items.len()
        );

        items
            .into_iter()
            .map(|item| Robot::from_item(item).map_err(RepoError::from))
            .collect()
    }
}

fn update_fields(update: RobotUpdate, updated_at: EpochSecs) -> Attributes {
    let mut fields = Attributes::new();
    if let Some(name) = update.name {
        fields.insert("name".to_string(), Value::String(name));
    }
    if let Some(description) = update.description {
        fields.insert(
            "description".to_string(),
            description.map_or(Value::Null, Value::String),
        );
    }
    fields.insert("updated_at".to_string(), Value::from(updated_at));
    fields
}

#[cfg(test)]
mod tests {
    use super::update_fields;
    use crate::model::robot::RobotUpdate;
    use serde_json::Value;

    #[test]
    fn update_fields_only_carry_supplied_values() {
        let fields = update_fields(RobotUpdate::new().name("Arm2"), 42);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["name"], "Arm2");
        assert_eq!(fields["updated_at"], 42);
        assert!(!fields.contains_key("listing_id"));
    }

    #[test]
    fn cleared_description_is_written_as_null() {
        let fields = update_fields(RobotUpdate::new().clear_description(), 7);
        assert_eq!(fields["description"], Value::Null);
    }
}
