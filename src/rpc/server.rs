//! Router assembly and the HTTP listener loop for the RPC transport.

use std::net::SocketAddr;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::error::Result;

use super::routes::create_api_routes;
use super::AppState;

/// Assembles the full application router over `state`.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_origin(Any);

    create_api_routes()
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

/// Binds `addr` and serves the RPC transport until the returned future is
/// dropped or the listener errors.
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("RPC transport listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
