//! Appliance scanner handlers.

use axum::extract::State;
use axum::Json;
use fleetdeck_scanner::{ScanImage, ScanOutcome};
use serde::{Deserialize, Serialize};

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};

/// Request body for a scan.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Base64 image payload without a data-URL prefix.
    pub image_base64: String,
    #[serde(default = "default_media_type")]
    pub media_type: String,
}

fn default_media_type() -> String {
    "image/jpeg".to_string()
}

/// Response body for the scan counter.
#[derive(Debug, Serialize)]
pub struct ScanCountResponse {
    pub count: u64,
}

/// Scan an appliance tag photo.
pub async fn scan_appliance(
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> ApiResult<Json<ScanOutcome>> {
    let scanner = state
        .scanner
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("no vision credential configured".to_string()))?;

    if body.image_base64.is_empty() {
        return Err(ApiError::BadRequest("image payload is required".to_string()));
    }

    let image = ScanImage::new(body.media_type, body.image_base64);
    let outcome = scanner.scan(&image).await?;
    Ok(Json(outcome))
}

/// Total scans performed so far.
pub async fn scan_count(State(state): State<AppState>) -> ApiResult<Json<ScanCountResponse>> {
    let scanner = state
        .scanner
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("no vision credential configured".to_string()))?;

    let count = scanner.scan_count().await?;
    Ok(Json(ScanCountResponse { count }))
}
