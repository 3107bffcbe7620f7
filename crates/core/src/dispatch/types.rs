//! Types for the delivery saga.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ledger::{NewPackage, Package};
use crate::pool::{Resource, ResourceKind};
use crate::service::ServiceError;

/// Inbound request for a delivery.
///
/// Missing fields deserialize as empty strings and are rejected by
/// [`DeliveryRequest::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryRequest {
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contents: String,
}

impl DeliveryRequest {
    pub fn new(
        recipient: impl Into<String>,
        address: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            address: address.into(),
            contents: contents.into(),
        }
    }

    /// Reject requests with a blank recipient, address or contents.
    pub fn validate(&self) -> Result<(), DispatchError> {
        self.to_new_package()
            .validate()
            .map_err(|e| DispatchError::BadRequest(e.to_string()))
    }

    pub(crate) fn to_new_package(&self) -> NewPackage {
        NewPackage {
            recipient: self.recipient.clone(),
            address: self.address.clone(),
            contents: self.contents.clone(),
        }
    }
}

/// What the caller gets back for an accepted delivery. Not stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryTicket {
    pub crew: Resource,
    pub ship: Resource,
    pub package: Package,
}

/// Progress of one delivery request through the synchronous saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStage {
    Received,
    CrewClaimed,
    ShipClaimed,
    PackageCreated,
    TicketReturned,
}

impl DeliveryStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStage::Received => "received",
            DeliveryStage::CrewClaimed => "crew_claimed",
            DeliveryStage::ShipClaimed => "ship_claimed",
            DeliveryStage::PackageCreated => "package_created",
            DeliveryStage::TicketReturned => "ticket_returned",
        }
    }
}

impl fmt::Display for DeliveryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a delivery request fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The request itself is malformed. Nothing was claimed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No crew member or ship is free. The caller may retry later.
    #[error("no {0} available")]
    Exhausted(ResourceKind),

    #[error("not found: {0}")]
    NotFound(String),

    /// A collaborator could not be reached or refused the request.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl DispatchError {
    /// Label used for the deliveries metric.
    pub fn result_label(&self) -> &'static str {
        match self {
            DispatchError::BadRequest(_) => "bad_request",
            DispatchError::Exhausted(_) => "exhausted",
            DispatchError::NotFound(_) => "not_found",
            DispatchError::Unavailable(_) => "unavailable",
        }
    }
}

impl From<ServiceError> for DispatchError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Exhausted(kind) => DispatchError::Exhausted(kind),
            ServiceError::NotFound(msg) => DispatchError::NotFound(msg),
            ServiceError::Rejected(msg) | ServiceError::Unavailable(msg) => {
                DispatchError::Unavailable(msg)
            }
        }
    }
}
