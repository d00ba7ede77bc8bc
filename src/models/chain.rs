//! Chain state objects read while pricing and finalizing transactions.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::{ObjectId, OperationId, Price};
use crate::{
    constants::GRAPHENE_100_PERCENT,
    utils::{deserialize_u64, deserialize_u64_map},
};

/// Named fee parameters of one operation, denominated in the core asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeeParameters(pub BTreeMap<String, u64>);

impl FeeParameters {
    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.get(name).copied()
    }
}

impl<'de> Deserialize<'de> for FeeParameters {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_u64_map(deserializer).map(FeeParameters)
    }
}

impl<const N: usize> From<[(&str, u64); N]> for FeeParameters {
    fn from(entries: [(&str, u64); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }
}

fn default_scale() -> u64 {
    GRAPHENE_100_PERCENT
}

/// The chain's current fee schedule (`global_properties.parameters.current_fees`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub parameters: Vec<(OperationId, FeeParameters)>,
    /// Multiplier applied to every fee, in units of `GRAPHENE_100_PERCENT`.
    #[serde(default = "default_scale", deserialize_with = "deserialize_u64")]
    pub scale: u64,
}

impl FeeSchedule {
    pub fn new(parameters: Vec<(OperationId, FeeParameters)>) -> Self {
        Self {
            parameters,
            scale: GRAPHENE_100_PERCENT,
        }
    }

    pub fn with_scale(mut self, scale: u64) -> Self {
        self.scale = scale;
        self
    }

    pub fn parameters_for(&self, id: OperationId) -> Option<&FeeParameters> {
        self.parameters
            .iter()
            .find(|(op_id, _)| *op_id == id)
            .map(|(_, params)| params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetOptions {
    pub core_exchange_rate: Price,
    #[serde(default)]
    pub flags: u16,
}

/// The subset of an asset object (`1.3.N`) needed to price fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetObject {
    pub id: ObjectId,
    pub symbol: String,
    pub precision: u8,
    pub options: AssetOptions,
    pub dynamic_asset_data_id: ObjectId,
}

/// Dynamic data of an asset (`2.3.N`); the fee pool is denominated in the core asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDynamicData {
    pub id: ObjectId,
    #[serde(deserialize_with = "deserialize_u64")]
    pub current_supply: u64,
    #[serde(default, deserialize_with = "deserialize_u64")]
    pub accumulated_fees: u64,
    #[serde(deserialize_with = "deserialize_u64")]
    pub fee_pool: u64,
}

/// Head-of-chain state (`2.1.0`), used for reference blocks and expirations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_number: u32,
    pub head_block_id: String,
    /// Head block time, `YYYY-MM-DDTHH:MM:SS` in UTC.
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_schedule_from_node_json() {
        let json = r#"{
            "parameters": [
                [0, {"fee": 86, "price_per_kbyte": 10}],
                [8, {"membership_annual_fee": 2000, "membership_lifetime_fee": "10000"}]
            ],
            "scale": 10000
        }"#;
        let schedule: FeeSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.scale, 10_000);
        let transfer = schedule.parameters_for(OperationId(0)).unwrap();
        assert_eq!(transfer.get("fee"), Some(86));
        let upgrade = schedule.parameters_for(OperationId(8)).unwrap();
        assert_eq!(upgrade.get("membership_lifetime_fee"), Some(10_000));
        assert!(schedule.parameters_for(OperationId(10)).is_none());
    }

    #[test]
    fn test_fee_schedule_defaults_scale() {
        let schedule: FeeSchedule = serde_json::from_str(r#"{"parameters": []}"#).unwrap();
        assert_eq!(schedule.scale, GRAPHENE_100_PERCENT);
    }

    #[test]
    fn test_asset_object_ignores_unknown_fields() {
        let json = r#"{
            "id": "1.3.1",
            "symbol": "EIDOS.USD",
            "precision": 4,
            "issuer": "1.2.0",
            "options": {
                "max_supply": "1000000000000000",
                "flags": 0,
                "core_exchange_rate": {
                    "base": {"amount": 100000, "asset_id": "1.3.0"},
                    "quote": {"amount": 100000, "asset_id": "1.3.1"}
                }
            },
            "dynamic_asset_data_id": "2.3.1"
        }"#;
        let asset: AssetObject = serde_json::from_str(json).unwrap();
        assert_eq!(asset.id, ObjectId::asset(1));
        assert_eq!(asset.dynamic_asset_data_id, ObjectId::new(2, 3, 1));
        assert_eq!(asset.options.core_exchange_rate.base.amount, 100_000);
    }

    #[test]
    fn test_dynamic_data_with_string_amounts() {
        let json = r#"{"id": "2.3.1", "current_supply": "5000000000000", "accumulated_fees": 0, "fee_pool": "2500000"}"#;
        let data: AssetDynamicData = serde_json::from_str(json).unwrap();
        assert_eq!(data.fee_pool, 2_500_000);
        assert_eq!(data.current_supply, 5_000_000_000_000);
    }
}
