//! Delivery orchestrator implementation.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::completion::{run_completion, CompletionJob, CompletionReport, CompletionTracker};
use super::config::DispatchConfig;
use super::types::{DeliveryRequest, DeliveryStage, DeliveryTicket, DispatchError};
use crate::metrics::{COMPENSATIONS_TOTAL, DELIVERIES_TOTAL, DELIVERY_FAILURES_BY_STAGE};
use crate::pool::Resource;
use crate::service::{PackageLedger, ResourceService};

/// The delivery orchestrator - claims crew and ship, records the package and
/// schedules the completion task.
///
/// Collaborators are injected, so one process can hold several isolated
/// orchestrators (tests do) and any collaborator can live in another process.
pub struct DeliveryOrchestrator {
    config: DispatchConfig,
    crew: Arc<dyn ResourceService>,
    ship: Arc<dyn ResourceService>,
    ledger: Arc<dyn PackageLedger>,
    completions: CompletionTracker,
}

impl DeliveryOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: DispatchConfig,
        crew: Arc<dyn ResourceService>,
        ship: Arc<dyn ResourceService>,
        ledger: Arc<dyn PackageLedger>,
    ) -> Self {
        Self {
            config,
            crew,
            ship,
            ledger,
            completions: CompletionTracker::new(),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Run the synchronous half of the saga for one request.
    ///
    /// On success the completion task is already scheduled when this returns;
    /// the caller never waits for it. On failure every resource claimed by an
    /// earlier step has been handed back.
    pub async fn dispatch(&self, request: DeliveryRequest) -> Result<DeliveryTicket, DispatchError> {
        let mut stage = DeliveryStage::Received;
        let result = self.run_saga(request, &mut stage).await;

        match &result {
            Ok(ticket) => {
                DELIVERIES_TOTAL.with_label_values(&["accepted"]).inc();
                info!(
                    "Delivery ticket created: package {} with {} aboard {}",
                    ticket.package.id, ticket.crew.name, ticket.ship.name
                );
            }
            Err(e) => {
                DELIVERIES_TOTAL.with_label_values(&[e.result_label()]).inc();
                DELIVERY_FAILURES_BY_STAGE
                    .with_label_values(&[stage.as_str()])
                    .inc();
                warn!("Delivery failed after stage {}: {}", stage, e);
            }
        }

        result
    }

    async fn run_saga(
        &self,
        request: DeliveryRequest,
        stage: &mut DeliveryStage,
    ) -> Result<DeliveryTicket, DispatchError> {
        debug!("Got request for new delivery to {}", request.recipient);
        request.validate()?;

        info!("Dispatching request for available crew");
        let crew = self.crew.reserve().await?;
        *stage = DeliveryStage::CrewClaimed;
        debug!("Got crew member {}", crew.name);

        info!("Dispatching request to reserve ship");
        let ship = match self.ship.reserve().await {
            Ok(ship) => ship,
            Err(e) => {
                self.compensate(self.crew.as_ref(), &crew).await;
                return Err(e.into());
            }
        };
        *stage = DeliveryStage::ShipClaimed;
        debug!("Got ship {}", ship.name);

        info!("Dispatching request to create new package");
        let package = match self.ledger.create(request.to_new_package()).await {
            Ok(package) => package,
            Err(e) => {
                self.compensate(self.ship.as_ref(), &ship).await;
                self.compensate(self.crew.as_ref(), &crew).await;
                return Err(e.into());
            }
        };
        *stage = DeliveryStage::PackageCreated;

        let ticket = DeliveryTicket {
            crew: crew.clone(),
            ship: ship.clone(),
            package: package.clone(),
        };

        let job = CompletionJob {
            package_id: package.id,
            crew,
            ship,
            transit: self.config.sample_transit(),
        };
        self.completions.spawn(run_completion(
            job,
            Arc::clone(&self.crew),
            Arc::clone(&self.ship),
            Arc::clone(&self.ledger),
            self.completions.shutdown_signal(),
        ));
        *stage = DeliveryStage::TicketReturned;

        Ok(ticket)
    }

    /// Hand back a resource claimed by an earlier saga step.
    ///
    /// A failed compensation is logged; the request still reports the error
    /// that triggered it.
    async fn compensate(&self, service: &dyn ResourceService, resource: &Resource) {
        let kind = service.kind();
        match service.release(&resource.name).await {
            Ok(_) => {
                COMPENSATIONS_TOTAL
                    .with_label_values(&[kind.as_str(), "released"])
                    .inc();
                info!("Released {} {} after failed delivery", kind, resource.name);
            }
            Err(e) => {
                COMPENSATIONS_TOTAL
                    .with_label_values(&[kind.as_str(), "failed"])
                    .inc();
                error!(
                    "Failed to release {} {} after failed delivery: {}",
                    kind, resource.name, e
                );
            }
        }
    }

    /// Completion tasks still running.
    pub fn in_flight(&self) -> usize {
        self.completions.in_flight()
    }

    /// Wait for every scheduled completion task.
    pub async fn wait_idle(&self) -> Vec<CompletionReport> {
        self.completions.wait_idle().await
    }

    /// Finish all outstanding deliveries immediately and wait for them.
    pub async fn shutdown(&self) -> Vec<CompletionReport> {
        self.completions.shutdown().await
    }
}
