//! Registry manager: CRUD with provider-aware validation.
//!
//! All mutating paths serialize through one write lock and re-read the
//! store immediately before writing. The registry has several independent
//! writers (user actions, confirmed transitions, drift sweeps); last-write-
//! wins is acceptable, writing a snapshot taken before an await point is
//! not.

use std::collections::HashMap;
use std::sync::Arc;

use fleetdeck_provider::ProviderApi;
use fleetdeck_types::{InstanceId, InstanceRecord, ObservedState, RemoteInstanceId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::store::RegistryStore;

/// Add/remove/list operations over the registry, plus the serialized
/// write paths used by the reconciliation engine.
pub struct RegistryManager {
    store: Arc<dyn RegistryStore>,
    provider: Arc<dyn ProviderApi>,
    write_lock: Mutex<()>,
}

impl RegistryManager {
    pub fn new(store: Arc<dyn RegistryStore>, provider: Arc<dyn ProviderApi>) -> Self {
        Self {
            store,
            provider,
            write_lock: Mutex::new(()),
        }
    }

    /// The persisted collection, in insertion order.
    pub async fn list(&self) -> RegistryResult<Vec<InstanceRecord>> {
        self.store.load().await
    }

    /// Look up a single record by local id.
    pub async fn get(&self, id: &InstanceId) -> RegistryResult<InstanceRecord> {
        self.store
            .load()
            .await?
            .into_iter()
            .find(|r| r.id == *id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    /// Register a new instance.
    ///
    /// Fails with `DuplicateId` if the remote id is already registered. The
    /// initial status is seeded with one `fetch_status` call; a failed or
    /// inconclusive seed defaults to stopped and is not surfaced to the
    /// caller.
    pub async fn add(
        &self,
        friendly_name: &str,
        remote_id: RemoteInstanceId,
    ) -> RegistryResult<InstanceRecord> {
        let friendly_name = friendly_name.trim();
        if friendly_name.is_empty() {
            return Err(RegistryError::Invalid("friendly name is required".to_string()));
        }
        if remote_id.as_str().trim().is_empty() {
            return Err(RegistryError::Invalid("remote instance id is required".to_string()));
        }

        // Seed outside the write lock; the duplicate check happens under it.
        let status = match self.provider.fetch_status(&remote_id).await {
            Ok(observed) => observed.as_running().unwrap_or(false),
            Err(err) => {
                warn!(
                    remote_id = %remote_id,
                    error = %err,
                    "could not verify instance status; adding with default status"
                );
                false
            }
        };

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load().await?;
        if records.iter().any(|r| r.remote_id == remote_id) {
            return Err(RegistryError::DuplicateId(remote_id));
        }

        let record = InstanceRecord::new(friendly_name, remote_id, status);
        records.push(record.clone());
        self.store.save(&records).await?;

        info!(id = %record.id, remote_id = %record.remote_id, "instance registered");
        Ok(record)
    }

    /// Remove a record by local id.
    ///
    /// Removing an id that does not exist (including one already removed)
    /// is `NotFound`, never silently ignored.
    pub async fn remove(&self, id: &InstanceId) -> RegistryResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load().await?;
        let before = records.len();
        records.retain(|r| r.id != *id);
        if records.len() == before {
            return Err(RegistryError::NotFound(id.clone()));
        }

        self.store.save(&records).await?;
        info!(id = %id, "instance removed");
        Ok(())
    }

    /// Write path for the power reconciler: persist a confirmed transition.
    pub async fn confirm_status(&self, id: &InstanceId, running: bool) -> RegistryResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load().await?;
        let record = records
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        if record.status != running {
            record.status = running;
            self.store.save(&records).await?;
        }
        Ok(())
    }

    /// Write path for the drift corrector: apply a sweep's observations.
    ///
    /// Updates exactly the records whose conclusive observed state differs
    /// from the cached one, in one atomic save against the freshest
    /// snapshot. Returns the number of records changed.
    pub async fn apply_observations(
        &self,
        observed: &HashMap<RemoteInstanceId, ObservedState>,
    ) -> RegistryResult<usize> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load().await?;

        let mut changed = 0;
        for record in records.iter_mut() {
            let Some(state) = observed.get(&record.remote_id) else {
                continue;
            };
            let Some(running) = state.as_running() else {
                // Inconclusive observations never flip a cached status.
                continue;
            };
            if record.status != running {
                debug!(
                    remote_id = %record.remote_id,
                    was = record.status,
                    now = running,
                    "observed drift"
                );
                record.status = running;
                changed += 1;
            }
        }

        if changed > 0 {
            self.store.save(&records).await?;
        }
        Ok(changed)
    }

    /// Manual single-record refresh: fetch the observed state and apply a
    /// conclusive difference through the drift write path.
    pub async fn refresh_one(&self, id: &InstanceId) -> RegistryResult<InstanceRecord> {
        let record = self.get(id).await?;
        let observed = self.provider.fetch_status(&record.remote_id).await?;

        let mut single = HashMap::new();
        single.insert(record.remote_id.clone(), observed);
        self.apply_observations(&single).await?;

        self.get(id).await
    }
}
