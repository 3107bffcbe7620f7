use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::metrics_middleware;
use super::{crew, deliveries, handlers, packages, ship};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Delivery orchestrator
        .route("/deliveries", post(deliveries::create_delivery))
        // Crew pool
        .route("/crew", get(crew::list_crew))
        .route("/crew/reserve", post(crew::reserve_crew))
        .route("/crew/return", post(crew::return_crew))
        // Ship pool
        .route("/ship/status", get(ship::get_status))
        .route("/ship/reserve", post(ship::reserve_ship))
        .route("/ship/return", post(ship::return_ship))
        // Package ledger
        .route(
            "/packages",
            post(packages::create_package).get(packages::list_packages),
        )
        .route("/packages/{id}", get(packages::get_package))
        .route("/packages/{id}/status", post(packages::update_status));

    Router::new()
        .route("/metrics", get(handlers::metrics))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
