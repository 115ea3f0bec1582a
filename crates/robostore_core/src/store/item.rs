use super::error::{StoreError, StoreResult};
use crate::model::listing::Listing;
use crate::model::robot::Robot;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Top-level attributes of a stored item.
pub type Attributes = Map<String, Value>;

/// Type tag stored alongside every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Robot,
    Listing,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Robot => "robot",
            Self::Listing => "listing",
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untyped envelope exchanged with an `ItemStore`.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub kind: ItemKind,
    pub attributes: Attributes,
}

/// Typed record that round-trips through an `Item` via serde.
pub trait StoredEntity: Serialize + DeserializeOwned {
    const KIND: ItemKind;

    /// Primary key under which the entity is stored.
    fn item_id(&self) -> String;

    fn to_item(&self) -> StoreResult<Item> {
        match serde_json::to_value(self)? {
            Value::Object(attributes) => Ok(Item {
                id: self.item_id(),
                kind: Self::KIND,
                attributes,
            }),
            other => Err(StoreError::InvalidData(format!(
                "{} serialized to non-object value `{other}`",
                Self::KIND
            ))),
        }
    }

    fn from_item(item: Item) -> StoreResult<Self> {
        if item.kind != Self::KIND {
            return Err(StoreError::InvalidData(format!(
                "expected {} item, got {} for id `{}`",
                Self::KIND,
                item.kind,
                item.id
            )));
        }
        Ok(serde_json::from_value(Value::Object(item.attributes))?)
    }
}

impl StoredEntity for Robot {
    const KIND: ItemKind = ItemKind::Robot;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}

impl StoredEntity for Listing {
    const KIND: ItemKind = ItemKind::Listing;

    fn item_id(&self) -> String {
        self.id.clone()
    }
}
