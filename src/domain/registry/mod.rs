//! Operation schema registry.
//!
//! Maps operation names and ids to their [`OperationSchema`]. The table is static and
//! the lookup indexes are built once, on first use, then shared read-only.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::{BuilderError, OperationId};

mod operations;
pub use operations::OPERATIONS;

mod schema;
pub use schema::*;

#[derive(Debug)]
pub struct OperationRegistry {
    by_name: HashMap<&'static str, &'static OperationSchema>,
    by_id: HashMap<OperationId, &'static OperationSchema>,
}

static REGISTRY: Lazy<OperationRegistry> = Lazy::new(|| OperationRegistry::new(OPERATIONS));

impl OperationRegistry {
    fn new(operations: &'static [OperationSchema]) -> Self {
        Self {
            by_name: operations.iter().map(|op| (op.name, op)).collect(),
            by_id: operations.iter().map(|op| (op.id, op)).collect(),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static OperationRegistry {
        &REGISTRY
    }

    pub fn lookup(
        &self,
        name: &str,
    ) -> Result<(OperationId, &'static OperationSchema), BuilderError> {
        self.by_name
            .get(name)
            .map(|schema| (schema.id, *schema))
            .ok_or_else(|| BuilderError::UnknownOperation(name.to_string()))
    }

    pub fn lookup_id(&self, id: OperationId) -> Result<&'static OperationSchema, BuilderError> {
        self.by_id
            .get(&id)
            .copied()
            .ok_or_else(|| BuilderError::UnknownOperation(format!("operation id {id}")))
    }

    /// Registered operations ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &'static OperationSchema> {
        OPERATIONS.iter()
    }
}
