//! Provider API contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleetdeck_types::{ObservedState, RemoteInstanceId};
use serde::{Deserialize, Serialize};

use crate::error::ProviderResult;

/// Acknowledgement that the provider accepted a power request.
///
/// Acceptance does not imply the transition has taken effect; the provider
/// API is not transactionally consistent with the start/stop call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub remote_id: RemoteInstanceId,
    pub accepted_at: DateTime<Utc>,
}

impl Ack {
    pub fn now(remote_id: RemoteInstanceId) -> Self {
        Self {
            remote_id,
            accepted_at: Utc::now(),
        }
    }
}

/// Result of a successful credential check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthInfo {
    /// Organization the credential belongs to, when the provider reports one.
    pub organization: Option<String>,
}

/// Stable local contract over the remote provider's REST API.
///
/// Implementations perform no retries.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    /// Request a power-on. Returns once the provider accepts the request,
    /// without waiting for the transition to complete.
    async fn start(&self, remote_id: &RemoteInstanceId) -> ProviderResult<Ack>;

    /// Request a power-off. Symmetric to [`ProviderApi::start`].
    async fn stop(&self, remote_id: &RemoteInstanceId) -> ProviderResult<Ack>;

    /// The provider's currently reported state for one instance.
    ///
    /// Implementations must disable response caching; callers need the
    /// freshest truth on every call.
    async fn fetch_status(&self, remote_id: &RemoteInstanceId) -> ProviderResult<ObservedState>;

    /// Validate the configured credential without side effects.
    async fn test_auth(&self) -> ProviderResult<AuthInfo>;
}
