//! Mock resource service for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::pool::{Resource, ResourceKind, ResourcePool};
use crate::service::{ResourceService, ServiceError};

/// A recorded release for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRelease {
    /// Name passed to `release`.
    pub name: String,
    /// Whether the release reached the pool.
    pub success: bool,
}

/// Resource service backed by a real [`ResourcePool`] with injectable failures.
pub struct MockResourceService {
    pool: Arc<ResourcePool>,
    releases: Arc<RwLock<Vec<RecordedRelease>>>,
    reserve_error: Arc<RwLock<Option<ServiceError>>>,
    release_error: Arc<RwLock<Option<ServiceError>>>,
}

impl MockResourceService {
    /// Wrap an existing pool.
    pub fn new(pool: Arc<ResourcePool>) -> Self {
        Self {
            pool,
            releases: Arc::new(RwLock::new(Vec::new())),
            reserve_error: Arc::new(RwLock::new(None)),
            release_error: Arc::new(RwLock::new(None)),
        }
    }

    /// The backing pool, for direct inspection.
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Configure the next `reserve` to fail with the given error.
    pub async fn set_reserve_error(&self, error: ServiceError) {
        *self.reserve_error.write().await = Some(error);
    }

    /// Make every `release` fail with the given error until cleared.
    pub async fn set_release_error(&self, error: ServiceError) {
        *self.release_error.write().await = Some(error);
    }

    /// Clear any configured release failure.
    pub async fn clear_release_error(&self) {
        *self.release_error.write().await = None;
    }

    /// Get all recorded releases.
    pub async fn recorded_releases(&self) -> Vec<RecordedRelease> {
        self.releases.read().await.clone()
    }
}

#[async_trait]
impl ResourceService for MockResourceService {
    fn kind(&self) -> ResourceKind {
        self.pool.kind()
    }

    async fn reserve(&self) -> Result<Resource, ServiceError> {
        if let Some(err) = self.reserve_error.write().await.take() {
            return Err(err);
        }
        Ok(self.pool.claim()?)
    }

    async fn release(&self, name: &str) -> Result<Resource, ServiceError> {
        let failure = self.release_error.read().await.clone();
        let result = match failure {
            Some(err) => Err(err),
            None => self.pool.release(name).map_err(ServiceError::from),
        };

        self.releases.write().await.push(RecordedRelease {
            name: name.to_string(),
            success: result.is_ok(),
        });
        result
    }
}
