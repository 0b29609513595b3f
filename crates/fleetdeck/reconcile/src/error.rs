//! Error types for the reconciliation engine.

use fleetdeck_provider::ProviderError;
use fleetdeck_registry::RegistryError;
use fleetdeck_types::RemoteInstanceId;
use thiserror::Error;

/// Hard failures of a reconciliation attempt.
///
/// An unconfirmed transition is not an error; it is a distinct soft outcome
/// reported through [`crate::ToggleOutcome`].
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The pre-flight credential check failed. No remote mutation was
    /// attempted.
    #[error("credential rejected: {0}")]
    Auth(ProviderError),

    /// The start/stop request itself failed. The record is unchanged.
    #[error("power request failed: {0}")]
    Request(ProviderError),

    /// A reconciliation is already in flight for this remote instance.
    #[error("a power transition is already in progress for {0}")]
    Busy(RemoteInstanceId),

    /// Registry access failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;
