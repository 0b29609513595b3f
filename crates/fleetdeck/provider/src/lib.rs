//! Remote compute provider client.
//!
//! Wraps the provider's REST API (start/stop/list/auth-test) behind the
//! [`ProviderApi`] trait. The client normalizes responses and errors and
//! performs no retries; retry and backoff policy belongs to callers, whose
//! budgets differ (one-shot confirmation window vs. periodic sweep).

pub mod api;
pub mod error;
pub mod http;

pub use api::{Ack, AuthInfo, ProviderApi};
pub use error::{ProviderError, ProviderResult};
pub use http::{HttpProviderClient, AUTH_ENV_VAR, DEFAULT_BASE_URL};
