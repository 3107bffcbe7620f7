//! In-memory package ledger.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{info, warn};

use super::types::{LedgerError, NewPackage, Package, PackageStatus};
use crate::metrics::PACKAGES_CREATED;

/// Length of generated package ids. 62^16 possible ids.
const ID_LENGTH: usize = 16;

#[derive(Default)]
struct LedgerInner {
    packages: HashMap<String, Package>,
    /// Ids in creation order, for listing.
    order: Vec<String>,
}

/// Package ledger kept in process memory.
///
/// All operations go through one ledger-wide mutex. Each is a short map
/// operation with no I/O, so the lock is never held for long.
#[derive(Default)]
pub struct MemoryLedger {
    inner: Mutex<LedgerInner>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a new package in `pending` state.
    pub fn create(&self, new: NewPackage) -> Package {
        let mut inner = self.lock();

        let mut id = generate_id();
        while inner.packages.contains_key(&id) {
            warn!("Generated package id {} collides, regenerating", id);
            id = generate_id();
        }

        let now = Utc::now();
        let package = Package {
            id: id.clone(),
            recipient: new.recipient,
            address: new.address,
            contents: new.contents,
            status: PackageStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        inner.packages.insert(id.clone(), package.clone());
        inner.order.push(id);
        drop(inner);

        PACKAGES_CREATED.inc();
        info!(
            "Created package {} for {} at {}",
            package.id, package.recipient, package.address
        );
        package
    }

    pub fn get(&self, id: &str) -> Result<Package, LedgerError> {
        self.lock()
            .packages
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    /// All packages in creation order.
    pub fn list(&self) -> Vec<Package> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.packages.get(id).cloned())
            .collect()
    }

    /// Replace the status of an existing package. Never creates a record.
    pub fn update_status(&self, id: &str, status: PackageStatus) -> Result<Package, LedgerError> {
        let mut inner = self.lock();
        let Some(package) = inner.packages.get_mut(id) else {
            warn!("Package {} was not found", id);
            return Err(LedgerError::NotFound(id.to_string()));
        };

        package.status = status;
        package.updated_at = Utc::now();
        let updated = package.clone();
        drop(inner);

        info!("Package {} is now {}", updated.id, updated.status);
        Ok(updated)
    }

    pub fn len(&self) -> usize {
        self.lock().packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}
