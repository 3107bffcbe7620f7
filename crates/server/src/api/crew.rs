//! Crew pool API handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use planet_express_core::{PoolError, Resource};

use super::{api_error, ApiError, ReturnBody};
use crate::state::AppState;

/// Roster snapshot in pool order.
pub async fn list_crew(State(state): State<Arc<AppState>>) -> Json<Vec<Resource>> {
    Json(state.crew().snapshot())
}

/// Claim the first free crew member.
pub async fn reserve_crew(State(state): State<Arc<AppState>>) -> Result<Json<Resource>, ApiError> {
    debug!("Received request for crew");
    state.crew().claim().map(Json).map_err(pool_error)
}

/// Hand a crew member back to the pool.
pub async fn return_crew(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ReturnBody>, JsonRejection>,
) -> Result<Json<Resource>, ApiError> {
    let Json(body) = body.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;
    debug!("Received request to return crew member {}", body.name);
    state.crew().release(&body.name).map(Json).map_err(pool_error)
}

fn pool_error(err: PoolError) -> ApiError {
    let status = match &err {
        PoolError::Exhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
        PoolError::NotFound { .. } => StatusCode::NOT_FOUND,
        PoolError::IdentityRequired(_) => StatusCode::BAD_REQUEST,
    };
    api_error(status, err.to_string())
}
