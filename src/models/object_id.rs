//! Graphene object identifiers (`space.type.instance`).

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ObjectIdError {
    #[error("malformed object id '{0}', expected space.type.instance")]
    Malformed(String),
    #[error("object id {found} is not of kind {space}.{type_id}")]
    WrongKind {
        found: String,
        space: u8,
        type_id: u8,
    },
}

/// Identifier of a chain object, e.g. `1.2.17` (account) or `1.3.0` (core asset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub space: u8,
    pub type_id: u8,
    pub instance: u64,
}

impl ObjectId {
    pub const fn new(space: u8, type_id: u8, instance: u64) -> Self {
        Self {
            space,
            type_id,
            instance,
        }
    }

    /// Asset id `1.3.<instance>`.
    pub const fn asset(instance: u64) -> Self {
        Self::new(1, 3, instance)
    }

    /// The core asset, `1.3.0`.
    pub const fn core_asset() -> Self {
        Self::asset(0)
    }

    pub fn is_core_asset(&self) -> bool {
        *self == Self::core_asset()
    }

    pub fn is_kind(&self, space: u8, type_id: u8) -> bool {
        self.space == space && self.type_id == type_id
    }

    /// Parses `value` and checks it names an object of the given kind.
    pub fn parse_kind(value: &str, space: u8, type_id: u8) -> Result<Self, ObjectIdError> {
        let id: ObjectId = value.parse()?;
        if !id.is_kind(space, type_id) {
            return Err(ObjectIdError::WrongKind {
                found: value.to_string(),
                space,
                type_id,
            });
        }
        Ok(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.space, self.type_id, self.instance)
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ObjectIdError::Malformed(s.to_string());
        let mut parts = s.split('.');
        let (Some(space), Some(type_id), Some(instance), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        Ok(Self {
            space: space.parse().map_err(|_| malformed())?,
            type_id: type_id.parse().map_err(|_| malformed())?,
            instance: instance.parse().map_err(|_| malformed())?,
        })
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}
