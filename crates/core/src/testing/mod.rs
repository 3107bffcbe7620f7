//! Testing utilities and mock collaborators.
//!
//! The mocks wrap the real in-process pool and ledger, so state behaves
//! exactly like production while individual calls can be made to fail.
//!
//! # Example
//!
//! ```rust,ignore
//! use planet_express_core::testing::{fixtures, MockLedger};
//!
//! let ledger = MockLedger::new();
//! ledger.set_create_error(ServiceError::Unavailable("down".into())).await;
//!
//! // Wire into a DeliveryOrchestrator...
//! ```

mod mock_ledger;
mod mock_resource;

pub use mock_ledger::MockLedger;
pub use mock_resource::{MockResourceService, RecordedRelease};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::dispatch::{DeliveryOrchestrator, DeliveryRequest, DispatchConfig};
    use crate::ledger::MemoryLedger;
    use crate::pool::{ResourceKind, ResourcePool, ResourceSpec};
    use crate::service::{PackageLedger, ResourceService};

    /// Single-member crew pool holding Fry.
    pub fn fry_only() -> ResourcePool {
        ResourcePool::new(
            ResourceKind::Crew,
            [ResourceSpec::new("Fry").with_role("Delivery Boy")],
        )
    }

    /// The full Planet Express crew.
    pub fn full_crew() -> ResourcePool {
        ResourcePool::new(
            ResourceKind::Crew,
            [
                ResourceSpec::new("Fry").with_role("Delivery Boy"),
                ResourceSpec::new("Leela").with_role("Captain"),
                ResourceSpec::new("Bender").with_role("Bending Unit"),
            ],
        )
    }

    /// The one and only ship.
    pub fn planet_express_ship() -> ResourcePool {
        ResourcePool::new(ResourceKind::Ship, [ResourceSpec::new("Planet Express Ship")])
    }

    /// The canonical delivery request.
    pub fn slurm_for_zoidberg() -> DeliveryRequest {
        DeliveryRequest::new("Zoidberg", "New New York", "Slurm")
    }

    /// Orchestrator over in-process collaborators with a fixed transit time.
    pub fn local_orchestrator(
        crew: Arc<ResourcePool>,
        ship: Arc<ResourcePool>,
        ledger: Arc<MemoryLedger>,
        transit: Duration,
    ) -> DeliveryOrchestrator {
        DeliveryOrchestrator::new(
            DispatchConfig::with_fixed_transit(transit),
            crew as Arc<dyn ResourceService>,
            ship as Arc<dyn ResourceService>,
            ledger as Arc<dyn PackageLedger>,
        )
    }
}
