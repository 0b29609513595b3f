//! In-memory registry store for development and testing.

use async_trait::async_trait;
use fleetdeck_types::InstanceRecord;
use std::sync::RwLock;

use crate::error::{RegistryError, RegistryResult};
use crate::store::RegistryStore;

/// In-memory [`RegistryStore`] implementation. Not durable.
#[derive(Default)]
pub struct InMemoryRegistryStore {
    records: RwLock<Vec<InstanceRecord>>,
}

impl InMemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records.
    pub fn with_records(records: Vec<InstanceRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl RegistryStore for InMemoryRegistryStore {
    async fn load(&self) -> RegistryResult<Vec<InstanceRecord>> {
        let guard = self
            .records
            .read()
            .map_err(|_| RegistryError::Storage("registry lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, records: &[InstanceRecord]) -> RegistryResult<()> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| RegistryError::Storage("registry lock poisoned".to_string()))?;
        *guard = records.to_vec();
        Ok(())
    }
}
