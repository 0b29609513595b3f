//! Reconciliation configuration.
//!
//! The poll interval and attempt budget encode the tradeoff between
//! responsiveness and false-negative timeouts; they are named configuration,
//! not inline constants.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the power reconciler's confirmation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Fixed wait between status polls.
    pub poll_interval: Duration,

    /// Maximum number of poll attempts before the outcome is reported
    /// unconfirmed. 12 attempts at 5 s give a ~60 s confirmation window.
    pub max_poll_attempts: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_poll_attempts: 12,
        }
    }
}

/// Configuration for the drift corrector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Fixed period between sweeps. One eager sweep also runs at startup.
    pub sweep_interval: Duration,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(30),
        }
    }
}
