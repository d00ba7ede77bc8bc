//! Deserialization utilities for graphene integer values
//!
//! Nodes render 64-bit integers (`share_type`, `uint64`) either as JSON numbers or, when
//! they exceed the safe JavaScript range, as decimal strings. These helpers accept both.
use std::{collections::BTreeMap, fmt};

use serde::{
    de::{self, MapAccess},
    Deserializer,
};

#[derive(Debug)]
struct U64Visitor;

impl de::Visitor<'_> for U64Visitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string containing a u64 number or a u64 integer")
    }

    // Handle string inputs like "10000000000"
    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse::<u64>().map_err(de::Error::custom)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u64::try_from(value)
            .map_err(|_| de::Error::custom("negative value cannot be converted to u64"))
    }
}

#[derive(Debug)]
struct U64MapVisitor;

impl<'de> de::Visitor<'de> for U64MapVisitor {
    type Value = BTreeMap<String, u64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of names to u64 numbers or numeric strings")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut values = BTreeMap::new();
        while let Some(key) = access.next_key::<String>()? {
            let value = access.next_value::<Share>()?;
            values.insert(key, value.0);
        }
        Ok(values)
    }
}

/// Newtype so map values can go through [`U64Visitor`].
struct Share(u64);

impl<'de> serde::Deserialize<'de> for Share {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(U64Visitor).map(Share)
    }
}

pub fn deserialize_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(U64Visitor)
}

/// Deserializes an object whose values are all u64 numbers or numeric strings,
/// such as the fee parameters of one operation.
pub fn deserialize_u64_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_map(U64MapVisitor)
}
