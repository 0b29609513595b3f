//! Durable store contract for the registry.

use async_trait::async_trait;
use fleetdeck_types::InstanceRecord;

use crate::error::RegistryResult;

/// Durable key-value boundary holding the serialized registry.
///
/// One logical key: reads return the full ordered list, writes replace it
/// atomically. No partial or field-level writes are assumed. Callers must
/// treat any loaded list as a snapshot and re-read immediately before
/// writing.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Load the full registry. An uninitialized store yields an empty list.
    async fn load(&self) -> RegistryResult<Vec<InstanceRecord>>;

    /// Atomically replace the full registry.
    async fn save(&self, records: &[InstanceRecord]) -> RegistryResult<()>;
}
