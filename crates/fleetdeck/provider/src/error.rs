//! Error types for the provider client.

use thiserror::Error;

/// Errors surfaced by provider calls.
///
/// Cloneable so test doubles can replay scripted failures.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The configured credential was rejected.
    #[error("credential rejected: {0}")]
    Auth(String),

    /// The provider no longer recognizes the instance id.
    #[error("remote instance not found: {0}")]
    NotFound(String),

    /// Network failure or provider-side (5xx) error.
    #[error("provider unavailable: {0}")]
    RemoteUnavailable(String),

    /// The provider answered with a payload we could not interpret.
    #[error("unexpected provider response: {0}")]
    Protocol(String),

    /// Local client configuration problem (bad base URL, missing token).
    #[error("provider client misconfigured: {0}")]
    Config(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
