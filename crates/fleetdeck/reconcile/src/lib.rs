//! Power-state reconciliation engine.
//!
//! Two components keep the registry's cached beliefs in line with remote
//! reality:
//!
//! - [`PowerReconciler`] drives one instance through a user-requested
//!   transition and confirms it with a bounded poll loop; the provider's
//!   start/stop calls are not transactionally consistent with the state
//!   they request.
//! - [`DriftCorrector`] periodically re-queries every registered instance
//!   in parallel and corrects cached statuses that drifted, independent of
//!   any in-flight reconciliation.

pub mod config;
pub mod drift;
pub mod error;
pub mod power;

pub use config::{DriftConfig, ReconcileConfig};
pub use drift::{DriftCorrector, SweepReport};
pub use error::{ReconcileError, ReconcileResult};
pub use power::{PowerReconciler, ToggleOutcome};

#[cfg(test)]
pub(crate) mod support;
