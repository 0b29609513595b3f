//! Power toggle handler.

use axum::extract::{Path, State};
use axum::Json;
use fleetdeck_reconcile::ToggleOutcome;
use fleetdeck_types::InstanceId;
use serde::Serialize;
use uuid::Uuid;

use crate::api::rest::state::AppState;
use crate::error::ApiResult;

/// Response body for a power toggle.
///
/// A toggle always ends one of three ways: confirmed (the registry now
/// reflects the new state), unconfirmed (soft warning; the cached status
/// was left alone), or a discrete error response for hard failures.
#[derive(Debug, Serialize)]
pub struct PowerResponse {
    pub outcome: &'static str,
    pub running: bool,
    pub message: String,
}

/// Toggle an instance's power; the target is the inverse of its cached
/// status.
pub async fn toggle_power(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PowerResponse>> {
    let id = InstanceId::from_uuid(id);
    let outcome = state.reconciler.toggle(&id).await?;

    let response = match outcome {
        ToggleOutcome::Confirmed { running } => PowerResponse {
            outcome: "confirmed",
            running,
            message: format!(
                "the instance has been confirmed {}",
                if running { "started" } else { "stopped" }
            ),
        },
        ToggleOutcome::Unconfirmed {
            target,
            last_observed,
        } => PowerResponse {
            outcome: "unconfirmed",
            // The cached belief was not changed: still the inverse of the
            // requested target.
            running: !target.as_running(),
            message: format!(
                "could not confirm the new state within the confirmation window \
                 (last observed: {}); check the provider dashboard directly",
                last_observed
            ),
        },
    };

    Ok(Json(response))
}
