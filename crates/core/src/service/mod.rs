//! Collaborator boundaries used by the delivery orchestrator.
//!
//! The orchestrator only ever talks to [`ResourceService`] and
//! [`PackageLedger`]. Both have an in-process implementation (the pool and the
//! ledger themselves) and an HTTP client for when the collaborator runs as a
//! separate service.

mod local;
mod remote;

pub use remote::{build_http_client, HttpLedgerClient, HttpResourceClient};

use async_trait::async_trait;
use thiserror::Error;

use crate::ledger::{NewPackage, Package, PackageStatus};
use crate::pool::{Resource, ResourceKind};

/// Errors surfaced by a collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// No resource of this kind is free right now.
    #[error("no {0} available")]
    Exhausted(ResourceKind),

    /// The named resource or package does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The collaborator refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The collaborator could not be reached or answered garbage.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Reservation boundary of a crew or ship pool.
#[async_trait]
pub trait ResourceService: Send + Sync {
    /// Kind of resource this service hands out.
    fn kind(&self) -> ResourceKind;

    /// Claim a free resource without waiting.
    async fn reserve(&self) -> Result<Resource, ServiceError>;

    /// Return a previously claimed resource. Idempotent.
    async fn release(&self, name: &str) -> Result<Resource, ServiceError>;
}

/// Boundary of the package ledger.
#[async_trait]
pub trait PackageLedger: Send + Sync {
    /// Record a new package in `pending` state.
    async fn create(&self, new: NewPackage) -> Result<Package, ServiceError>;

    async fn get(&self, id: &str) -> Result<Package, ServiceError>;

    async fn list(&self) -> Result<Vec<Package>, ServiceError>;

    /// Replace a package's status. Unknown ids yield `NotFound`.
    async fn update_status(&self, id: &str, status: PackageStatus)
        -> Result<Package, ServiceError>;
}
