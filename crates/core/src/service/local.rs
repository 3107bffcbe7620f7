//! In-process implementations of the collaborator boundaries.

use async_trait::async_trait;

use super::{PackageLedger, ResourceService, ServiceError};
use crate::ledger::{LedgerError, MemoryLedger, NewPackage, Package, PackageStatus};
use crate::pool::{PoolError, Resource, ResourceKind, ResourcePool};

impl From<PoolError> for ServiceError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Exhausted(kind) => ServiceError::Exhausted(kind),
            PoolError::NotFound { .. } => ServiceError::NotFound(err.to_string()),
            PoolError::IdentityRequired(_) => ServiceError::Rejected(err.to_string()),
        }
    }
}

impl From<LedgerError> for ServiceError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(_) => ServiceError::NotFound(err.to_string()),
        }
    }
}

#[async_trait]
impl ResourceService for ResourcePool {
    fn kind(&self) -> ResourceKind {
        ResourcePool::kind(self)
    }

    async fn reserve(&self) -> Result<Resource, ServiceError> {
        Ok(self.claim()?)
    }

    async fn release(&self, name: &str) -> Result<Resource, ServiceError> {
        Ok(ResourcePool::release(self, name)?)
    }
}

#[async_trait]
impl PackageLedger for MemoryLedger {
    async fn create(&self, new: NewPackage) -> Result<Package, ServiceError> {
        Ok(MemoryLedger::create(self, new))
    }

    async fn get(&self, id: &str) -> Result<Package, ServiceError> {
        Ok(MemoryLedger::get(self, id)?)
    }

    async fn list(&self) -> Result<Vec<Package>, ServiceError> {
        Ok(MemoryLedger::list(self))
    }

    async fn update_status(
        &self,
        id: &str,
        status: PackageStatus,
    ) -> Result<Package, ServiceError> {
        Ok(MemoryLedger::update_status(self, id, status)?)
    }
}
