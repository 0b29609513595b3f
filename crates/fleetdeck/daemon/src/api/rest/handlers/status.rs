//! Health, connectivity, and auth handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::rest::state::AppState;
use crate::error::ApiResult;

/// Response body for the liveness probe.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Response body for the provider connectivity summary.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub connected: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// Provider connectivity summary for the dashboard indicator.
///
/// Always answers 200; connectivity problems are data, not errors.
pub async fn daemon_status(State(state): State<AppState>) -> Json<StatusResponse> {
    match state.provider.test_auth().await {
        Ok(info) => Json(StatusResponse {
            connected: true,
            message: "provider API is connected".to_string(),
            organization: info.organization,
        }),
        Err(err) => Json(StatusResponse {
            connected: false,
            message: format!("failed to connect to provider API: {}", err),
            organization: None,
        }),
    }
}

/// Response body for an explicit credential check.
#[derive(Debug, Serialize)]
pub struct AuthTestResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// Validate the configured provider credential.
pub async fn auth_test(State(state): State<AppState>) -> ApiResult<Json<AuthTestResponse>> {
    let info = state.provider.test_auth().await?;
    Ok(Json(AuthTestResponse {
        success: true,
        organization: info.organization,
    }))
}
