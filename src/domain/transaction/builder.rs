//! Transaction assembly.
//!
//! [`TransactionBuilder`] owns the ordered operations of one transaction. Operations
//! are encoded on insertion, priced in place by [`TransactionBuilder::resolve_fees`], and
//! handed to signing as an [`UnsignedTransaction`] by [`TransactionBuilder::finalize`].

use log::{debug, info};
use serde_json::Value;

use crate::{
    config::ChainConfig,
    constants::BLOCK_ID_LENGTH,
    domain::{fees, OperationEncoder},
    models::{BuilderError, FeeResolutionError, Operation, UnsignedTransaction},
    services::provider::ChainQueryTrait,
    utils::parse_time_point_sec,
};

#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    encoder: OperationEncoder,
    operations: Vec<Operation>,
    expiration_seconds: u32,
    ref_block_num: u16,
    ref_block_prefix: u32,
    expiration: u32,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::with_config(&ChainConfig::default())
    }
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for the chain described by `config`: public keys are checked
    /// against its address prefix and `finalize` uses its expiration offset.
    pub fn with_config(config: &ChainConfig) -> Self {
        Self {
            encoder: OperationEncoder::new(config.address_prefix.clone()),
            operations: Vec::new(),
            expiration_seconds: config.tx_expiration_seconds,
            ref_block_num: 0,
            ref_block_prefix: 0,
            expiration: 0,
        }
    }

    /// Encodes operation `name` from `payload` and appends it to the transaction.
    pub fn add(&mut self, name: &str, payload: &Value) -> Result<&mut Self, BuilderError> {
        let operation = self.get(name, payload)?;
        debug!("Adding {} operation #{}", operation.name, self.operations.len());
        self.operations.push(operation);
        Ok(self)
    }

    /// Appends an operation encoded beforehand, e.g. with [`TransactionBuilder::get`].
    ///
    /// The operation is re-validated against its schema before it is accepted.
    pub fn add_operation(&mut self, operation: Operation) -> Result<&mut Self, BuilderError> {
        let pair = serde_json::to_value(&operation).map_err(|e| {
            BuilderError::schema_violation(operation.name(), "payload", e.to_string())
        })?;
        let operation = self.encoder.encode_pair(&pair)?;
        debug!("Adding {} operation #{}", operation.name, self.operations.len());
        self.operations.push(operation);
        Ok(self)
    }

    /// Encodes operation `name` from `payload` without adding it, for embedding into a
    /// container such as a proposal's `proposed_ops`.
    pub fn get(&self, name: &str, payload: &Value) -> Result<Operation, BuilderError> {
        self.encoder.encode(name, payload)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn ref_block_num(&self) -> u16 {
        self.ref_block_num
    }

    pub fn ref_block_prefix(&self) -> u32 {
        self.ref_block_prefix
    }

    /// Expiration in seconds since the epoch, `0` until set.
    pub fn expiration(&self) -> u32 {
        self.expiration
    }

    /// Resolves the fees of all operations against current chain state.
    ///
    /// Takes `&mut self`, so only one resolution can run on a draft at a time.
    pub async fn resolve_fees<C>(&mut self, chain: &C) -> Result<(), BuilderError>
    where
        C: ChainQueryTrait + ?Sized,
    {
        fees::resolve_fees(&mut self.operations, chain).await?;
        Ok(())
    }

    /// Binds the transaction to a recent block.
    ///
    /// `head_block_id` is the hex encoded 20 byte block id; the prefix is the little
    /// endian `u32` at bytes 4..8.
    pub fn set_reference_block(
        &mut self,
        head_block_number: u32,
        head_block_id: &str,
    ) -> Result<(), BuilderError> {
        let id = hex::decode(head_block_id).map_err(|e| {
            BuilderError::InvalidReferenceBlock(format!("block id '{head_block_id}': {e}"))
        })?;
        if id.len() != BLOCK_ID_LENGTH {
            return Err(BuilderError::InvalidReferenceBlock(format!(
                "block id has {} bytes, expected {BLOCK_ID_LENGTH}",
                id.len()
            )));
        }

        let mut prefix = [0u8; 4];
        prefix.copy_from_slice(&id[4..8]);
        self.ref_block_num = (head_block_number & 0xFFFF) as u16;
        self.ref_block_prefix = u32::from_le_bytes(prefix);
        Ok(())
    }

    /// Sets the expiration to `seconds` after `head_time` (`YYYY-MM-DDTHH:MM:SS`).
    pub fn set_expire_seconds(
        &mut self,
        head_time: &str,
        seconds: u32,
    ) -> Result<(), BuilderError> {
        let head = parse_time_point_sec(head_time).ok_or_else(|| {
            BuilderError::InvalidReferenceBlock(format!("head block time '{head_time}'"))
        })?;
        self.expiration = head.checked_add(seconds).ok_or_else(|| {
            BuilderError::InvalidReferenceBlock(format!(
                "expiration {head_time} + {seconds}s is out of range"
            ))
        })?;
        Ok(())
    }

    /// Prepares the transaction for signing: binds it to the current head block, sets
    /// the expiration and resolves all fees.
    pub async fn finalize<C>(&mut self, chain: &C) -> Result<UnsignedTransaction, BuilderError>
    where
        C: ChainQueryTrait + ?Sized,
    {
        if self.operations.is_empty() {
            return Err(BuilderError::EmptyTransaction);
        }

        let properties = chain
            .get_dynamic_global_properties()
            .await
            .map_err(FeeResolutionError::from)?;
        self.set_reference_block(properties.head_block_number, &properties.head_block_id)?;
        self.set_expire_seconds(&properties.time, self.expiration_seconds)?;
        self.resolve_fees(chain).await?;

        info!(
            "Finalized transaction with {} operations (ref block {}, prefix {})",
            self.operations.len(),
            self.ref_block_num,
            self.ref_block_prefix
        );
        Ok(UnsignedTransaction {
            ref_block_num: self.ref_block_num,
            ref_block_prefix: self.ref_block_prefix,
            expiration: self.expiration,
            operations: self.operations.clone(),
            extensions: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            AssetAmount, DynamicGlobalProperties, FeeParameters, FeeSchedule, FieldValue, ObjectId,
            OperationId, Payload,
        },
        services::provider::{MockChainQueryTrait, ProviderError},
    };
    use serde_json::json;

    const HEAD_BLOCK_ID: &str = "0012d687c5a3b1dd6f2bd6a1d7d2b5a4b1b6b7b8";

    fn transfer() -> Value {
        json!({
            "fee": {"amount": 0, "asset_id": "1.3.0"},
            "from": "1.2.1",
            "to": "1.2.2",
            "amount": {"amount": 50000, "asset_id": "1.3.0"}
        })
    }

    fn chain() -> MockChainQueryTrait {
        let mut chain = MockChainQueryTrait::new();
        chain.expect_get_dynamic_global_properties().returning(|| {
            Box::pin(async {
                Ok(DynamicGlobalProperties {
                    head_block_number: 1_234_567,
                    head_block_id: HEAD_BLOCK_ID.to_string(),
                    time: "2025-01-01T00:00:00".to_string(),
                })
            })
        });
        chain.expect_get_fee_schedule().returning(|| {
            Box::pin(async {
                Ok(FeeSchedule::new(vec![(
                    OperationId(0),
                    FeeParameters::from([("fee", 2_000), ("price_per_kbyte", 10)]),
                )]))
            })
        });
        chain
    }

    #[test]
    fn test_add_and_get() {
        let mut builder = TransactionBuilder::new();
        assert!(builder.is_empty());
        builder
            .add("transfer", &transfer())
            .unwrap()
            .add("transfer", &transfer())
            .unwrap();
        assert_eq!(builder.len(), 2);

        let op = builder.get("transfer", &transfer()).unwrap();
        assert_eq!(builder.len(), 2);
        builder.add_operation(op.clone()).unwrap();
        assert_eq!(builder.operations()[2], op);
    }

    #[test]
    fn test_add_operation_revalidates() {
        let builder = TransactionBuilder::new();
        let mut op = builder.get("transfer", &transfer()).unwrap();
        op.payload = Payload::new(
            *op.fee(),
            vec![("from", FieldValue::ObjectId(ObjectId::new(1, 2, 1)))],
            None,
        );

        let mut builder = TransactionBuilder::new();
        match builder.add_operation(op) {
            Err(BuilderError::SchemaViolation {
                operation, field, ..
            }) => {
                assert_eq!(operation, "transfer");
                assert_eq!(field, "to");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(builder.is_empty());
    }

    #[test]
    fn test_add_rejects_invalid_payload() {
        let mut builder = TransactionBuilder::new();
        assert!(matches!(
            builder.add("transfer", &json!({"from": "1.2.1"})),
            Err(BuilderError::SchemaViolation { .. })
        ));
        assert!(matches!(
            builder.add("nonexistent", &json!({})),
            Err(BuilderError::UnknownOperation(_))
        ));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_set_reference_block() {
        let mut builder = TransactionBuilder::new();
        builder
            .set_reference_block(1_234_567, HEAD_BLOCK_ID)
            .unwrap();
        assert_eq!(builder.ref_block_num(), 54_919);
        assert_eq!(builder.ref_block_prefix(), 3_719_406_533);

        assert!(matches!(
            builder.set_reference_block(1, "0012d687"),
            Err(BuilderError::InvalidReferenceBlock(_))
        ));
        assert!(matches!(
            builder.set_reference_block(1, "not hex"),
            Err(BuilderError::InvalidReferenceBlock(_))
        ));
    }

    #[test]
    fn test_set_expire_seconds() {
        let mut builder = TransactionBuilder::new();
        builder
            .set_expire_seconds("2025-01-01T00:00:00", 120)
            .unwrap();
        assert_eq!(builder.expiration(), 1_735_689_720);
        assert!(builder.set_expire_seconds("yesterday", 120).is_err());
        assert!(builder
            .set_expire_seconds("2106-02-07T06:28:15", 1)
            .is_err());
    }

    #[tokio::test]
    async fn test_finalize() {
        let mut builder = TransactionBuilder::new();
        builder.add("transfer", &transfer()).unwrap();
        let tx = builder.finalize(&chain()).await.unwrap();

        assert_eq!(tx.ref_block_num, 54_919);
        assert_eq!(tx.ref_block_prefix, 3_719_406_533);
        assert_eq!(tx.expiration, 1_735_689_600 + 120);
        assert_eq!(tx.operations[0].fee(), &AssetAmount::core(2_000));

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["expiration"], json!("2025-01-01T00:02:00"));
        assert_eq!(value["operations"][0][1]["fee"]["amount"], json!(2000));
    }

    #[tokio::test]
    async fn test_finalize_uses_configured_expiration() {
        let config = ChainConfig {
            tx_expiration_seconds: 3_600,
            ..ChainConfig::default()
        };
        let mut builder = TransactionBuilder::with_config(&config);
        builder.add("transfer", &transfer()).unwrap();
        let tx = builder.finalize(&chain()).await.unwrap();
        assert_eq!(tx.expiration, 1_735_689_600 + 3_600);
    }

    #[tokio::test]
    async fn test_finalize_empty_transaction() {
        let mut builder = TransactionBuilder::new();
        let err = builder
            .finalize(&MockChainQueryTrait::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BuilderError::EmptyTransaction));
    }

    #[tokio::test]
    async fn test_finalize_provider_failure() {
        let mut chain = MockChainQueryTrait::new();
        chain
            .expect_get_dynamic_global_properties()
            .returning(|| Box::pin(async { Err(ProviderError::RateLimited) }));

        let mut builder = TransactionBuilder::new();
        builder.add("transfer", &transfer()).unwrap();
        let err = builder.finalize(&chain).await.unwrap_err();
        assert!(matches!(err, BuilderError::FeeResolution(_)));
        assert!(err.is_transient());
        assert_eq!(builder.operations()[0].fee().amount, 0);
    }

    #[tokio::test]
    async fn test_resolve_fees_on_draft() {
        let mut builder = TransactionBuilder::new();
        builder.add("transfer", &transfer()).unwrap();
        builder.resolve_fees(&chain()).await.unwrap();
        assert_eq!(builder.operations()[0].fee(), &AssetAmount::core(2_000));
    }
}
