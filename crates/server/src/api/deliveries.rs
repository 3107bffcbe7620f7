//! Delivery API handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use planet_express_core::{DeliveryRequest, DeliveryTicket, DispatchError};

use super::{api_error, ApiError};
use crate::state::AppState;

/// Accept a delivery request and run it through the orchestrator.
///
/// Returns the ticket as soon as the package is recorded; the delivery itself
/// completes in the background.
pub async fn create_delivery(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DeliveryRequest>, JsonRejection>,
) -> Result<Json<DeliveryTicket>, ApiError> {
    let Json(request) = body.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;

    state
        .orchestrator()
        .dispatch(request)
        .await
        .map(Json)
        .map_err(dispatch_error)
}

fn dispatch_error(err: DispatchError) -> ApiError {
    let status = match &err {
        DispatchError::BadRequest(_) => StatusCode::BAD_REQUEST,
        DispatchError::NotFound(_) => StatusCode::NOT_FOUND,
        DispatchError::Exhausted(_) | DispatchError::Unavailable(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    api_error(status, err.to_string())
}
