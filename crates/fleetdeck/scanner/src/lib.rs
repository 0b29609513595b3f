//! Appliance tag scanner.
//!
//! A thin wrapper around a hosted vision model: the model receives a photo
//! of an appliance rating tag plus a fixed extraction prompt and returns
//! the model/serial numbers as strict JSON. Every successful scan is
//! recorded in an append-only log file, which also backs the scan counter
//! shown on the dashboard.

pub mod error;
pub mod log;
pub mod prompt;
pub mod result;
pub mod transport;

pub use error::{ScanError, ScanResult};
pub use log::ScanLog;
pub use result::{parse_model_output, ScanOutcome, ScanType};
pub use transport::{OpenAiVisionTransport, ScanImage, VisionTransport, AUTH_ENV_VAR, DEFAULT_MODEL};

use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

/// Orchestrates one scan: vision call, parse, log.
pub struct ApplianceScanner {
    transport: Arc<dyn VisionTransport>,
    log: ScanLog,
}

impl ApplianceScanner {
    pub fn new(transport: Arc<dyn VisionTransport>, log: ScanLog) -> Self {
        Self { transport, log }
    }

    /// Run one scan. A logging failure never fails the scan itself.
    pub async fn scan(&self, image: &ScanImage) -> ScanResult<ScanOutcome> {
        let raw = self.transport.extract(prompt::EXTRACTION_PROMPT, image).await?;
        let outcome = parse_model_output(&raw)?;

        if let Err(err) = self.log.append(&outcome, Utc::now()).await {
            warn!(error = %err, "failed to record scan in log");
        }

        Ok(outcome)
    }

    /// Total scans recorded so far.
    pub async fn scan_count(&self) -> ScanResult<u64> {
        self.log.count().await
    }
}
