use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use planet_express_core::{
    build_http_client, Config, DeliveryOrchestrator, HttpLedgerClient, HttpResourceClient,
    MemoryLedger, PackageLedger, ResourceKind, ResourcePool, ResourceService, ResourceSpec,
};

/// Shared application state.
///
/// The in-process crew pool, ship pool and ledger are always served at their
/// own endpoints. The orchestrator may instead be wired to remote instances.
pub struct AppState {
    config: Config,
    orchestrator: Arc<DeliveryOrchestrator>,
    crew: Arc<ResourcePool>,
    ship: Arc<ResourcePool>,
    ledger: Arc<MemoryLedger>,
}

impl AppState {
    pub fn new(
        config: Config,
        orchestrator: Arc<DeliveryOrchestrator>,
        crew: Arc<ResourcePool>,
        ship: Arc<ResourcePool>,
        ledger: Arc<MemoryLedger>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            crew,
            ship,
            ledger,
        }
    }

    /// Provision pools and ledger from the configuration and wire the
    /// orchestrator to local or remote collaborators per `[services]`.
    pub fn from_config(config: Config) -> Result<Self> {
        let crew = Arc::new(ResourcePool::new(
            ResourceKind::Crew,
            config.crew.members.iter().map(ResourceSpec::from),
        ));
        let ship = Arc::new(ResourcePool::new(
            ResourceKind::Ship,
            config.ship.fleet.iter().map(ResourceSpec::from),
        ));
        let ledger = Arc::new(MemoryLedger::new());
        info!(
            "Provisioned {} crew member(s) and {} ship(s)",
            crew.len(),
            ship.len()
        );

        let services = &config.services;
        let client = build_http_client(Duration::from_secs(services.timeout_secs))
            .context("Failed to build HTTP client")?;

        let crew_service = resource_service(&client, &crew, services.crew_url.as_deref());
        let ship_service = resource_service(&client, &ship, services.ship_url.as_deref());
        let ledger_service: Arc<dyn PackageLedger> = match services.package_url.as_deref() {
            Some(url) => {
                info!("Using remote package service at {}", url);
                Arc::new(HttpLedgerClient::new(client.clone(), url))
            }
            None => Arc::clone(&ledger) as Arc<dyn PackageLedger>,
        };

        let orchestrator = Arc::new(DeliveryOrchestrator::new(
            config.dispatch.clone(),
            crew_service,
            ship_service,
            ledger_service,
        ));

        Ok(Self::new(config, orchestrator, crew, ship, ledger))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orchestrator(&self) -> &Arc<DeliveryOrchestrator> {
        &self.orchestrator
    }

    pub fn crew(&self) -> &ResourcePool {
        &self.crew
    }

    pub fn ship(&self) -> &ResourcePool {
        &self.ship
    }

    pub fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }
}

fn resource_service(
    client: &Client,
    local: &Arc<ResourcePool>,
    url: Option<&str>,
) -> Arc<dyn ResourceService> {
    match url {
        Some(url) => {
            info!("Using remote {} service at {}", local.kind(), url);
            Arc::new(HttpResourceClient::new(client.clone(), local.kind(), url))
        }
        None => Arc::clone(local) as Arc<dyn ResourceService>,
    }
}
