//! Ship pool API handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::debug;

use planet_express_core::{PoolError, Resource};

use super::{api_error, ApiError, ReturnBody};
use crate::state::AppState;

/// Fleet snapshot in pool order.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<Vec<Resource>> {
    Json(state.ship().snapshot())
}

/// Claim a free ship. An occupied fleet is a conflict rather than an outage.
pub async fn reserve_ship(State(state): State<Arc<AppState>>) -> Result<Json<Resource>, ApiError> {
    debug!("Received request to reserve ship");
    state.ship().claim().map(Json).map_err(pool_error)
}

/// Hand a ship back. Without a body the only ship in the fleet is released.
pub async fn return_ship(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ReturnBody>>,
) -> Result<Json<Resource>, ApiError> {
    let released = match body {
        Some(Json(body)) => {
            debug!("Received request to return ship {}", body.name);
            state.ship().release(&body.name)
        }
        None => {
            debug!("Received request to return the ship");
            state.ship().release_only()
        }
    };
    released.map(Json).map_err(pool_error)
}

fn pool_error(err: PoolError) -> ApiError {
    let status = match &err {
        PoolError::Exhausted(_) => StatusCode::CONFLICT,
        PoolError::NotFound { .. } => StatusCode::NOT_FOUND,
        PoolError::IdentityRequired(_) => StatusCode::BAD_REQUEST,
    };
    api_error(status, err.to_string())
}
