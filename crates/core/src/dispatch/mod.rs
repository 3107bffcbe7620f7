//! Delivery dispatch saga.
//!
//! A delivery request runs synchronously through
//! `Received -> CrewClaimed -> ShipClaimed -> PackageCreated -> TicketReturned`.
//! Any failure releases what earlier steps claimed. Once the ticket is
//! returned, a detached completion task simulates transit, marks the package
//! delivered and hands both resources back:
//! - **Front half**: [`DeliveryOrchestrator::dispatch`], caller waits
//! - **Back half**: [`CompletionTracker`] task, caller does not wait

mod completion;
mod config;
mod orchestrator;
mod types;

pub use completion::{
    run_completion, CompletionError, CompletionJob, CompletionReport, CompletionStep,
    CompletionTracker,
};
pub use config::DispatchConfig;
pub use orchestrator::DeliveryOrchestrator;
pub use types::{DeliveryRequest, DeliveryStage, DeliveryTicket, DispatchError};
