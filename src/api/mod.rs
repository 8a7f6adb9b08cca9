//! JSON HTTP API over the record store, estimator, proposal generator,
//! forecaster and assistant.
//!
//! All routes live under `/api`. Errors are returned as `{"error": "..."}`
//! with status 400, 404 or 500.

mod error;
mod handlers;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};

use crate::assistant::Assistant;
use crate::store::Repository;

pub use error::ApiError;

/// Application state shared across all request handlers.
///
/// The store does its own locking, so the state itself is immutable and
/// shared through an `Arc`.
pub struct AppState {
    /// Record store for cities, buildings, sensors and saved results.
    pub store: Arc<dyn Repository>,
    /// Backend for `/api/chat`.
    pub assistant: Assistant,
}

impl AppState {
    pub fn new(store: Arc<dyn Repository>, assistant: Assistant) -> Arc<Self> {
        Arc::new(Self { store, assistant })
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/cities",
            get(handlers::list_cities).post(handlers::create_city),
        )
        .route("/api/cities/{id}", get(handlers::get_city))
        .route("/api/cities/{id}/layers", get(handlers::list_layers))
        .route("/api/cities/{id}/buildings", get(handlers::list_buildings))
        .route("/api/cities/{id}/sensors", get(handlers::list_sensors))
        .route("/api/cities/{id}/simulations", get(handlers::list_simulations))
        .route("/api/cities/{id}/proposals", get(handlers::list_city_proposals))
        .route("/api/layers", post(handlers::create_layer))
        .route("/api/buildings/{id}", get(handlers::get_building))
        .route(
            "/api/buildings/{id}/proposals",
            get(handlers::list_building_proposals),
        )
        .route("/api/sensors/{id}/readings", post(handlers::add_reading))
        .route("/api/sensors/{id}/forecast", get(handlers::sensor_forecast))
        .route("/api/simulate", post(handlers::simulate))
        .route("/api/propose", post(handlers::propose))
        .route("/api/forecast", post(handlers::forecast))
        .route("/api/chat", post(handlers::chat))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Logs one line per request: method, path, status and latency.
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();
    let response = next.run(req).await;
    tracing::info!(
        "{method} {path} {} in {}ms",
        response.status().as_u16(),
        start.elapsed().as_millis()
    );
    response
}

/// Binds to the given address and serves the API until Ctrl-C.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an I/O error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("serving on port {}", addr.port());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
