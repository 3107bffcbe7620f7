pub mod crew;
pub mod deliveries;
pub mod handlers;
pub mod middleware;
pub mod packages;
pub mod routes;
pub mod ship;

pub use routes::create_router;

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Status code plus JSON error body.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Request body naming a resource to hand back.
#[derive(Debug, Deserialize)]
pub struct ReturnBody {
    pub name: String,
}
