//! Append-only scan log.
//!
//! One line per successful scan:
//! `{timestamp} | {model} | {serial} | {TYPE} | {CORRECTIONS}`.
//! The dashboard's scan counter is the number of lines.

use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::error::ScanResult;
use crate::result::ScanOutcome;

/// File-backed scan log.
pub struct ScanLog {
    path: PathBuf,
}

impl ScanLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry.
    pub async fn append(&self, outcome: &ScanOutcome, at: DateTime<Utc>) -> ScanResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let corrections = if outcome.corrections.is_empty() {
            "NONE".to_string()
        } else {
            outcome.corrections.to_uppercase()
        };
        let entry = format!(
            "{} | {} | {} | {} | {}\n",
            at.to_rfc3339_opts(SecondsFormat::Secs, true),
            outcome.model_number,
            outcome.serial_number,
            outcome.scan_type,
            corrections,
        );

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Number of entries logged so far. A missing log counts as zero.
    pub async fn count(&self) -> ScanResult<u64> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(contents.lines().filter(|l| !l.trim().is_empty()).count() as u64),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ScanType;

    fn outcome() -> ScanOutcome {
        ScanOutcome {
            model_number: "WOS51EC0HS20".to_string(),
            serial_number: "HR93700339".to_string(),
            confidence: "high".to_string(),
            corrections: "none".to_string(),
            scan_type: ScanType::Barcode,
        }
    }

    #[tokio::test]
    async fn test_append_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let log = ScanLog::new(dir.path().join("logs").join("scan_log.txt"));

        assert_eq!(log.count().await.unwrap(), 0);
        log.append(&outcome(), Utc::now()).await.unwrap();
        log.append(&outcome(), Utc::now()).await.unwrap();
        assert_eq!(log.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_entry_format() {
        let dir = tempfile::tempdir().unwrap();
        let log = ScanLog::new(dir.path().join("scan_log.txt"));

        log.append(&outcome(), Utc::now()).await.unwrap();
        let contents = tokio::fs::read_to_string(log.path()).await.unwrap();
        let line = contents.lines().next().unwrap();

        let fields: Vec<&str> = line.split(" | ").collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[1], "WOS51EC0HS20");
        assert_eq!(fields[3], "BARCODE");
        assert_eq!(fields[4], "NONE");
    }
}
