//! Instance registry handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fleetdeck_reconcile::SweepReport;
use fleetdeck_types::{InstanceId, InstanceRecord, RemoteInstanceId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};

/// Request body for registering an instance.
#[derive(Debug, Deserialize)]
pub struct AddInstanceRequest {
    pub friendly_name: String,
    pub remote_id: String,
}

/// Response body for a manual sweep.
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    /// False when a sweep was already in progress and this one was skipped.
    pub swept: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SweepReport>,
}

/// List all registered instances in insertion order.
pub async fn list_instances(State(state): State<AppState>) -> ApiResult<Json<Vec<InstanceRecord>>> {
    Ok(Json(state.registry.list().await?))
}

/// Register a new instance.
pub async fn add_instance(
    State(state): State<AppState>,
    Json(body): Json<AddInstanceRequest>,
) -> ApiResult<(StatusCode, Json<InstanceRecord>)> {
    let record = state
        .registry
        .add(&body.friendly_name, RemoteInstanceId::new(body.remote_id))
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Remove an instance by local id.
pub async fn remove_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.registry.remove(&InstanceId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Manually refresh one record's status from the provider.
pub async fn refresh_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InstanceRecord>> {
    let record = state.registry.refresh_one(&InstanceId::from_uuid(id)).await?;
    Ok(Json(record))
}

/// Manually trigger a full drift sweep.
pub async fn refresh_all(State(state): State<AppState>) -> ApiResult<Json<SweepResponse>> {
    let report = state.drift.sweep().await.map_err(ApiError::from)?;
    Ok(Json(SweepResponse {
        swept: report.is_some(),
        report,
    }))
}
