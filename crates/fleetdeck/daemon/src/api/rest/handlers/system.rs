//! System lifecycle handlers.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};

/// Response body for system shutdown requests.
#[derive(Debug, Serialize)]
pub struct ShutdownResponse {
    pub stopping: bool,
}

/// Request a graceful daemon shutdown.
///
/// The drift loop and the HTTP server both watch the same shutdown
/// channel; in-flight requests are drained before the process exits.
pub async fn shutdown_daemon(State(state): State<AppState>) -> ApiResult<Json<ShutdownResponse>> {
    info!("shutdown requested over the API");
    state
        .shutdown_tx
        .send(true)
        .map_err(|_| ApiError::Internal("shutdown channel closed".to_string()))?;

    Ok(Json(ShutdownResponse { stopping: true }))
}
