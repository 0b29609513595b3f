//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Status and auth
        .route("/status", get(handlers::daemon_status))
        .route("/auth/test", post(handlers::auth_test))
        .route("/system/shutdown", post(handlers::shutdown_daemon))
        // Instances
        .route("/instances", get(handlers::list_instances))
        .route("/instances", post(handlers::add_instance))
        .route("/instances/refresh", post(handlers::refresh_all))
        .route("/instances/:id", delete(handlers::remove_instance))
        .route("/instances/:id/power", post(handlers::toggle_power))
        .route("/instances/:id/refresh", post(handlers::refresh_instance))
        // Appliance scanner
        .route("/scan", post(handlers::scan_appliance))
        .route("/scan/count", get(handlers::scan_count))
        // Static pages
        .route("/pages", get(handlers::list_pages))
        .route("/pages/*path", get(handlers::get_page))
        .route("/pages/*path", put(handlers::put_page));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
