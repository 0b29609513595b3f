//! Scan outcome and model-output parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ScanError, ScanResult};

/// How the model obtained the extracted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Barcode,
    Qr,
    Ocr,
    Mixed,
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Barcode => "BARCODE",
            Self::Qr => "QR",
            Self::Ocr => "OCR",
            Self::Mixed => "MIXED",
        };
        write!(f, "{}", s)
    }
}

/// Structured result of one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub model_number: String,
    pub serial_number: String,
    pub confidence: String,
    #[serde(default)]
    pub corrections: String,
    pub scan_type: ScanType,
}

/// Parse the model's reply into a [`ScanOutcome`].
///
/// Models occasionally wrap the JSON in a markdown fence or lead with a
/// short preamble; anything between the first `{` and the last `}` is
/// treated as the payload.
pub fn parse_model_output(raw: &str) -> ScanResult<ScanOutcome> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    let payload = match (start, end) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => {
            return Err(ScanError::Malformed(format!(
                "no JSON object in model output: {}",
                truncate(raw, 120)
            )))
        }
    };

    serde_json::from_str(payload)
        .map_err(|e| ScanError::Malformed(format!("{}: {}", e, truncate(payload, 120))))
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let cut = s
            .char_indices()
            .take_while(|(i, _)| *i < max)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}…", &s[..cut])
    }
}
