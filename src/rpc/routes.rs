//! Route table for the RPC transport (§6).

use axum::routing::{get, post};
use axum::Router;

use super::handlers;
use super::AppState;

/// Registers the five RPC methods plus a health check, mirroring this
/// codebase's `/api/v1/...` route layout.
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/regions", post(handlers::create))
        .route("/api/v1/regions/set", post(handlers::set))
        .route("/api/v1/regions/get", post(handlers::get))
        .route("/api/v1/regions/increase-ref-count", post(handlers::increase_ref_count))
        .route("/api/v1/regions/decrease-ref-count", post(handlers::decrease_ref_count))
        .route("/api/v1/health", get(handlers::health_check))
}
