//! Package ledger API handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use planet_express_core::{LedgerError, NewPackage, Package, PackageStatus, ParseStatusError};

use super::{api_error, ApiError};
use crate::state::AppState;

/// Request body for a status update
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

/// Record a new package in `pending` state
pub async fn create_package(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewPackage>, JsonRejection>,
) -> Result<(StatusCode, Json<Package>), ApiError> {
    let Json(new) = body.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;

    new.validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok((StatusCode::CREATED, Json(state.ledger().create(new))))
}

/// List packages in creation order
pub async fn list_packages(State(state): State<Arc<AppState>>) -> Json<Vec<Package>> {
    Json(state.ledger().list())
}

/// Get a package by ID
pub async fn get_package(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Package>, ApiError> {
    state.ledger().get(&id).map(Json).map_err(ledger_error)
}

/// Move a package to a new status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<Package>, ApiError> {
    let Json(body) = body.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;
    let status: PackageStatus = body
        .status
        .parse()
        .map_err(|e: ParseStatusError| {
            api_error(StatusCode::BAD_REQUEST, e.to_string())
        })?;

    state
        .ledger()
        .update_status(&id, status)
        .map(Json)
        .map_err(ledger_error)
}

fn ledger_error(err: LedgerError) -> ApiError {
    match err {
        LedgerError::NotFound(_) => api_error(StatusCode::NOT_FOUND, err.to_string()),
    }
}
