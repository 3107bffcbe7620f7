//! Mock package ledger for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ledger::{MemoryLedger, NewPackage, Package, PackageStatus};
use crate::service::{PackageLedger, ServiceError};

/// Package ledger backed by a real [`MemoryLedger`] with injectable failures.
///
/// - `set_create_error`: the next `create` fails once
/// - `set_update_error`: every `update_status` fails until cleared
#[derive(Default)]
pub struct MockLedger {
    inner: MemoryLedger,
    create_error: Arc<RwLock<Option<ServiceError>>>,
    update_error: Arc<RwLock<Option<ServiceError>>>,
    create_calls: Arc<RwLock<usize>>,
    update_calls: Arc<RwLock<usize>>,
}

impl MockLedger {
    /// Create a new mock ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing ledger, for direct inspection.
    pub fn ledger(&self) -> &MemoryLedger {
        &self.inner
    }

    /// Configure the next `create` to fail with the given error.
    pub async fn set_create_error(&self, error: ServiceError) {
        *self.create_error.write().await = Some(error);
    }

    /// Make every `update_status` fail with the given error.
    pub async fn set_update_error(&self, error: ServiceError) {
        *self.update_error.write().await = Some(error);
    }

    /// Clear any configured update failure.
    pub async fn clear_update_error(&self) {
        *self.update_error.write().await = None;
    }

    /// Number of `create` calls, failed ones included.
    pub async fn create_calls(&self) -> usize {
        *self.create_calls.read().await
    }

    /// Number of `update_status` calls, failed ones included.
    pub async fn update_calls(&self) -> usize {
        *self.update_calls.read().await
    }
}

#[async_trait]
impl PackageLedger for MockLedger {
    async fn create(&self, new: NewPackage) -> Result<Package, ServiceError> {
        *self.create_calls.write().await += 1;
        if let Some(err) = self.create_error.write().await.take() {
            return Err(err);
        }
        Ok(self.inner.create(new))
    }

    async fn get(&self, id: &str) -> Result<Package, ServiceError> {
        Ok(self.inner.get(id)?)
    }

    async fn list(&self) -> Result<Vec<Package>, ServiceError> {
        Ok(self.inner.list())
    }

    async fn update_status(
        &self,
        id: &str,
        status: PackageStatus,
    ) -> Result<Package, ServiceError> {
        *self.update_calls.write().await += 1;
        if let Some(err) = self.update_error.read().await.clone() {
            return Err(err);
        }
        Ok(self.inner.update_status(id, status)?)
    }
}
