pub mod config;
pub mod dispatch;
pub mod ledger;
pub mod metrics;
pub mod pool;
pub mod service;
pub mod testing;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, CrewConfig, CrewMemberConfig, ServerConfig, ServicesConfig, ShipConfig,
    ShipEntryConfig, TrafficConfig,
};
pub use dispatch::{
    CompletionError, CompletionReport, CompletionStep, DeliveryOrchestrator, DeliveryRequest,
    DeliveryStage, DeliveryTicket, DispatchConfig, DispatchError,
};
pub use ledger::{
    LedgerError, MemoryLedger, MissingFieldsError, NewPackage, Package, PackageStatus,
    ParseStatusError,
};
pub use pool::{PoolError, Resource, ResourceKind, ResourcePool, ResourceSpec};
pub use service::{
    build_http_client, HttpLedgerClient, HttpResourceClient, PackageLedger, ResourceService,
    ServiceError,
};
