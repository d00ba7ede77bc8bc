//! Asset amounts and prices.

use serde::{Deserialize, Serialize};

use super::ObjectId;
use crate::utils::deserialize_u64;

/// An amount of a given asset, the graphene `asset` struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    #[serde(deserialize_with = "deserialize_u64")]
    pub amount: u64,
    pub asset_id: ObjectId,
}

impl AssetAmount {
    pub fn new(amount: u64, asset_id: ObjectId) -> Self {
        Self { amount, asset_id }
    }

    pub fn core(amount: u64) -> Self {
        Self::new(amount, ObjectId::core_asset())
    }

    /// Zero fee requested in `asset_id`, the state of a fee before resolution.
    pub fn zero(asset_id: ObjectId) -> Self {
        Self::new(0, asset_id)
    }
}

/// Ratio between two assets. `base` and `quote` must name different assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub base: AssetAmount,
    pub quote: AssetAmount,
}

impl Price {
    pub fn new(base: AssetAmount, quote: AssetAmount) -> Self {
        Self { base, quote }
    }

    /// Converts `amount` to the other asset of this price, rounding up.
    ///
    /// Returns `None` when `amount` is in neither leg, when a leg is zero, when both
    /// legs are the same asset, or when the result does not fit in a `u64`.
    pub fn convert_round_up(&self, amount: AssetAmount) -> Option<AssetAmount> {
        if self.base.asset_id == self.quote.asset_id
            || self.base.amount == 0
            || self.quote.amount == 0
        {
            return None;
        }
        let (from, to) = if amount.asset_id == self.base.asset_id {
            (self.base, self.quote)
        } else if amount.asset_id == self.quote.asset_id {
            (self.quote, self.base)
        } else {
            return None;
        };
        let numerator = u128::from(amount.amount) * u128::from(to.amount);
        let converted = numerator.div_ceil(u128::from(from.amount));
        u64::try_from(converted)
            .ok()
            .map(|value| AssetAmount::new(value, to.asset_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cer(core: u64, asset: u64) -> Price {
        Price::new(
            AssetAmount::core(core),
            AssetAmount::new(asset, ObjectId::asset(1)),
        )
    }

    #[test]
    fn test_deserialize_string_and_numeric_amounts() {
        let a: AssetAmount =
            serde_json::from_str(r#"{"amount": "10000000000", "asset_id": "1.3.1"}"#).unwrap();
        assert_eq!(a.amount, 10_000_000_000);
        assert_eq!(a.asset_id, ObjectId::asset(1));

        let b: AssetAmount = serde_json::from_str(r#"{"amount": 7, "asset_id": "1.3.0"}"#).unwrap();
        assert_eq!(b, AssetAmount::core(7));
    }

    #[test]
    fn test_convert_from_base_to_quote() {
        // 1 core = 2 units of 1.3.1
        let price = cer(1, 2);
        let converted = price.convert_round_up(AssetAmount::core(150)).unwrap();
        assert_eq!(converted, AssetAmount::new(300, ObjectId::asset(1)));
    }

    #[test]
    fn test_convert_from_quote_to_base() {
        let price = cer(1, 2);
        let converted = price
            .convert_round_up(AssetAmount::new(300, ObjectId::asset(1)))
            .unwrap();
        assert_eq!(converted, AssetAmount::core(150));
    }

    #[test]
    fn test_convert_rounds_up() {
        // 3 core = 1 unit
        let price = cer(3, 1);
        let converted = price.convert_round_up(AssetAmount::core(10)).unwrap();
        assert_eq!(converted.amount, 4);
    }

    #[test]
    fn test_convert_rejects_unusable_prices() {
        assert!(cer(0, 1).convert_round_up(AssetAmount::core(10)).is_none());
        assert!(cer(1, 0).convert_round_up(AssetAmount::core(10)).is_none());
        let unrelated = AssetAmount::new(10, ObjectId::asset(7));
        assert!(cer(1, 1).convert_round_up(unrelated).is_none());
        let same = Price::new(AssetAmount::core(1), AssetAmount::core(2));
        assert!(same.convert_round_up(AssetAmount::core(10)).is_none());
    }

    #[test]
    fn test_convert_overflow_is_none() {
        let price = cer(1, u64::MAX);
        assert!(price.convert_round_up(AssetAmount::core(2)).is_none());
    }
}
