//! HTTP API server for order placement and order history.
//!
//! Provides REST endpoints for placing orders and reading a user's orders,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::{OrderPlacementService, OrderQueryService};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: OrderRepository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/orders",
            get(routes::orders::list::<R>).post(routes::orders::create::<R>),
        )
        .route("/orders/{id}", get(routes::orders::get::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over a repository.
///
/// Both services share the repository, so it must be cheap to clone
/// (the in-memory store shares its state, the PostgreSQL store its pool).
pub fn create_default_state<R: OrderRepository + Clone + 'static>(
    repository: R,
) -> Arc<AppState<R>> {
    Arc::new(AppState {
        placement: OrderPlacementService::new(repository.clone()),
        queries: OrderQueryService::new(repository),
    })
}
