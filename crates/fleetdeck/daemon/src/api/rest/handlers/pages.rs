//! Static-page editor handlers.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Response body for a page read.
#[derive(Debug, Serialize)]
pub struct PageBody {
    pub path: String,
    pub content: String,
}

/// Request body for a page write.
#[derive(Debug, Deserialize)]
pub struct PutPageRequest {
    pub content: String,
}

/// List editable pages.
pub async fn list_pages(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.pages.list().await?))
}

/// Read one page.
pub async fn get_page(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<Json<PageBody>> {
    let content = state.pages.read(&path).await?;
    Ok(Json(PageBody { path, content }))
}

/// Create or replace one page. Requires the shared admin token.
pub async fn put_page(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    Json(body): Json<PutPageRequest>,
) -> ApiResult<StatusCode> {
    authorize_admin(&state, &headers)?;
    state.pages.write(&path, &body.content).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn authorize_admin(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(ApiError::Forbidden(
            "page editing is disabled: no admin token configured".to_string(),
        ));
    };

    let supplied = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if supplied != expected {
        return Err(ApiError::Unauthorized("invalid admin token".to_string()));
    }
    Ok(())
}
