//! Scan-based, non-blocking resource pool.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use tracing::{debug, info, warn};

use super::types::{PoolError, Resource, ResourceKind, ResourceSpec};
use crate::metrics::{RESOURCE_CLAIMS, RESOURCE_RELEASES};

/// A fixed set of named resources of one kind.
///
/// Resources are provisioned once in [`ResourcePool::new`]; the pool never
/// grows or shrinks afterwards. There is no pool-wide lock: each resource sits
/// behind its own mutex, which is held only for a check-and-flip.
pub struct ResourcePool {
    kind: ResourceKind,
    slots: Vec<Mutex<Resource>>,
    index: HashMap<String, usize>,
}

impl ResourcePool {
    /// Provision a pool. Every resource starts available.
    ///
    /// Later duplicates of a name are unreachable by `release`; config
    /// validation rejects them before a pool is built.
    pub fn new(kind: ResourceKind, specs: impl IntoIterator<Item = ResourceSpec>) -> Self {
        let mut slots = Vec::new();
        let mut index = HashMap::new();

        for spec in specs {
            index.entry(spec.name.clone()).or_insert(slots.len());
            slots.push(Mutex::new(Resource {
                name: spec.name,
                role: spec.role,
                available: true,
            }));
        }

        info!("Provisioned {} pool with {} resources", kind, slots.len());

        Self { kind, slots, index }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Claim the first available resource in pool order.
    ///
    /// A resource whose mutex is currently held by another caller is skipped,
    /// not waited on. This can report `Exhausted` while a resource is being
    /// released concurrently; the caller decides whether to retry.
    pub fn claim(&self) -> Result<Resource, PoolError> {
        for slot in &self.slots {
            let mut resource = match slot.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    debug!("Skipping contended {} slot", self.kind);
                    continue;
                }
            };

            if resource.available {
                resource.available = false;
                let claimed = resource.clone();
                drop(resource);

                debug!("{} {} claimed", self.kind, claimed.name);
                RESOURCE_CLAIMS
                    .with_label_values(&[self.kind.as_str(), "claimed"])
                    .inc();
                return Ok(claimed);
            }
        }

        warn!("No {} available", self.kind);
        RESOURCE_CLAIMS
            .with_label_values(&[self.kind.as_str(), "exhausted"])
            .inc();
        Err(PoolError::Exhausted(self.kind))
    }

    /// Mark the named resource available again.
    ///
    /// Releasing a resource that is already available is a no-op.
    pub fn release(&self, name: &str) -> Result<Resource, PoolError> {
        let Some(&idx) = self.index.get(name) else {
            warn!("Cannot release unknown {} {}", self.kind, name);
            RESOURCE_RELEASES
                .with_label_values(&[self.kind.as_str(), "not_found"])
                .inc();
            return Err(PoolError::NotFound {
                kind: self.kind,
                name: name.to_string(),
            });
        };

        Ok(self.release_slot(idx))
    }

    /// Release the pool's only resource without naming it.
    pub fn release_only(&self) -> Result<Resource, PoolError> {
        match self.slots.len() {
            1 => Ok(self.release_slot(0)),
            _ => Err(PoolError::IdentityRequired(self.kind)),
        }
    }

    fn release_slot(&self, idx: usize) -> Resource {
        let mut resource = lock(&self.slots[idx]);
        if resource.available {
            debug!("{} {} was already available", self.kind, resource.name);
        }
        resource.available = true;
        let released = resource.clone();
        drop(resource);

        debug!("{} {} released", self.kind, released.name);
        RESOURCE_RELEASES
            .with_label_values(&[self.kind.as_str(), "released"])
            .inc();
        released
    }

    /// Current state of every resource, in pool order.
    pub fn snapshot(&self) -> Vec<Resource> {
        self.slots.iter().map(|slot| lock(slot).clone()).collect()
    }

    /// Number of resources currently marked available.
    pub fn available_count(&self) -> usize {
        self.slots.iter().filter(|slot| lock(slot).available).count()
    }
}

fn lock(slot: &Mutex<Resource>) -> MutexGuard<'_, Resource> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn crew_pool() -> ResourcePool {
        ResourcePool::new(
            ResourceKind::Crew,
            [
                ResourceSpec::new("Fry").with_role("Delivery Boy"),
                ResourceSpec::new("Leela").with_role("Captain"),
                ResourceSpec::new("Bender").with_role("Bending Unit"),
            ],
        )
    }

    fn ship_pool() -> ResourcePool {
        ResourcePool::new(ResourceKind::Ship, [ResourceSpec::new("Planet Express Ship")])
    }

    #[test]
    fn test_claim_follows_pool_order() {
        let pool = crew_pool();
        assert_eq!(pool.claim().unwrap().name, "Fry");
        assert_eq!(pool.claim().unwrap().name, "Leela");
        assert_eq!(pool.claim().unwrap().name, "Bender");
        assert_eq!(pool.claim(), Err(PoolError::Exhausted(ResourceKind::Crew)));
    }

    #[test]
    fn test_claimed_snapshot_is_unavailable() {
        let pool = crew_pool();
        let fry = pool.claim().unwrap();
        assert!(!fry.available);
        assert_eq!(fry.role.as_deref(), Some("Delivery Boy"));
        assert_eq!(pool.available_count(), 2);
    }

    #[test]
    fn test_claim_release_claim_single_resource() {
        let pool = ship_pool();
        let first = pool.claim().unwrap();
        assert_eq!(pool.claim(), Err(PoolError::Exhausted(ResourceKind::Ship)));

        let released = pool.release(&first.name).unwrap();
        assert!(released.available);

        let second = pool.claim().unwrap();
        assert_eq!(first.name, second.name);
    }

    #[test]
    fn test_release_makes_resource_eligible_again() {
        let pool = crew_pool();
        let fry = pool.claim().unwrap();
        let _leela = pool.claim().unwrap();

        pool.release(&fry.name).unwrap();

        // Fry is first in pool order, so he is picked before Bender
        assert_eq!(pool.claim().unwrap().name, "Fry");
        assert_eq!(pool.claim().unwrap().name, "Bender");
    }

    #[test]
    fn test_release_is_idempotent() {
        let pool = crew_pool();
        let before = pool.snapshot();

        let released = pool.release("Leela").unwrap();
        assert!(released.available);
        assert_eq!(pool.snapshot(), before);
        assert_eq!(pool.available_count(), 3);
    }

    #[test]
    fn test_release_unknown_is_not_found() {
        let pool = crew_pool();
        let err = pool.release("Zapp Brannigan").unwrap_err();
        assert_eq!(
            err,
            PoolError::NotFound {
                kind: ResourceKind::Crew,
                name: "Zapp Brannigan".to_string(),
            }
        );
    }

    #[test]
    fn test_release_only_single_ship() {
        let pool = ship_pool();
        pool.claim().unwrap();
        assert_eq!(pool.available_count(), 0);

        let ship = pool.release_only().unwrap();
        assert_eq!(ship.name, "Planet Express Ship");
        assert!(ship.available);
        assert_eq!(pool.available_count(), 1);
    }

    #[test]
    fn test_release_only_requires_identity_for_fleet() {
        let pool = crew_pool();
        assert_eq!(
            pool.release_only(),
            Err(PoolError::IdentityRequired(ResourceKind::Crew))
        );
    }

    #[test]
    fn test_release_only_on_empty_pool_requires_identity() {
        let pool = ResourcePool::new(ResourceKind::Ship, Vec::<ResourceSpec>::new());
        assert_eq!(
            pool.release_only(),
            Err(PoolError::IdentityRequired(ResourceKind::Ship))
        );
    }

    #[test]
    fn test_concurrent_claims_never_exceed_capacity() {
        // Run several rounds to give the scheduler a chance to interleave
        for _ in 0..20 {
            let pool = Arc::new(crew_pool());
            let callers = 8;
            let barrier = Arc::new(Barrier::new(callers));

            let handles: Vec<_> = (0..callers)
                .map(|_| {
                    let pool = Arc::clone(&pool);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        pool.claim()
                    })
                })
                .collect();

            let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            let claimed: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();

            assert!(claimed.len() <= pool.len());
            let distinct: HashSet<_> = claimed.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(distinct.len(), claimed.len(), "a resource was claimed twice");
            assert_eq!(pool.available_count(), pool.len() - claimed.len());
        }
    }

    #[test]
    fn test_n_concurrent_claims_succeed_then_exhausted() {
        let pool = Arc::new(crew_pool());
        let barrier = Arc::new(Barrier::new(pool.len()));

        let handles: Vec<_> = (0..pool.len())
            .map(|_| {
                let pool = Arc::clone(&pool);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    pool.claim()
                })
            })
            .collect();

        // Every slot a caller skips ends up claimed by another caller, and each
        // caller claims at most one, so N callers on N resources all succeed.
        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
        assert_eq!(pool.available_count(), 0);
        assert_eq!(pool.claim(), Err(PoolError::Exhausted(ResourceKind::Crew)));
    }
}
