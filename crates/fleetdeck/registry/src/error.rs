//! Error types for the registry crate.

use fleetdeck_provider::ProviderError;
use fleetdeck_types::{InstanceId, RemoteInstanceId};
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No record with the given local id.
    #[error("instance not found: {0}")]
    NotFound(InstanceId),

    /// A record with the given remote id already exists.
    #[error("instance with remote id {0} already exists")]
    DuplicateId(RemoteInstanceId),

    /// Caller-supplied input failed validation.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// The durable store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The persisted registry could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A provider call made on behalf of a registry operation failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
