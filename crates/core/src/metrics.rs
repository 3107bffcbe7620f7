//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Resource pools (claims, releases)
//! - Delivery saga (outcomes, failed stages, compensations)
//! - Completion tasks (per-step outcomes, transit time)
//! - Package ledger

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Resource Pool Metrics
// =============================================================================

/// Claim attempts by resource kind and result.
pub static RESOURCE_CLAIMS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "planet_express_resource_claims_total",
            "Total resource claim attempts",
        ),
        &["kind", "result"], // result: "claimed", "exhausted"
    )
    .unwrap()
});

/// Release attempts by resource kind and result.
pub static RESOURCE_RELEASES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "planet_express_resource_releases_total",
            "Total resource release attempts",
        ),
        &["kind", "result"], // result: "released", "not_found"
    )
    .unwrap()
});

// =============================================================================
// Delivery Saga Metrics
// =============================================================================

/// Delivery requests by outcome.
pub static DELIVERIES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "planet_express_deliveries_total",
            "Total delivery requests handled by the orchestrator",
        ),
        &["result"], // "accepted", "bad_request", "exhausted", "not_found", "unavailable"
    )
    .unwrap()
});

/// Failed deliveries by the last stage reached before the failure.
pub static DELIVERY_FAILURES_BY_STAGE: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "planet_express_delivery_failures_total",
            "Failed delivery requests by saga stage",
        ),
        &["stage"],
    )
    .unwrap()
});

/// Compensating releases performed after a failed saga step.
pub static COMPENSATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "planet_express_compensations_total",
            "Resources released because a later saga step failed",
        ),
        &["kind", "result"], // result: "released", "failed"
    )
    .unwrap()
});

// =============================================================================
// Completion Task Metrics
// =============================================================================

/// Completion task side effects by step and result.
pub static COMPLETION_STEPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "planet_express_completion_steps_total",
            "Completion task steps by outcome",
        ),
        &["step", "result"], // result: "success", "failed"
    )
    .unwrap()
});

/// Simulated transit time in seconds.
pub static TRANSIT_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "planet_express_transit_duration_seconds",
            "Simulated transit time of completed deliveries",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 10.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Ledger Metrics
// =============================================================================

/// Packages recorded by the in-process ledger.
pub static PACKAGES_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "planet_express_packages_created_total",
        "Total packages recorded by the ledger",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Pools
        Box::new(RESOURCE_CLAIMS.clone()),
        Box::new(RESOURCE_RELEASES.clone()),
        // Saga
        Box::new(DELIVERIES_TOTAL.clone()),
        Box::new(DELIVERY_FAILURES_BY_STAGE.clone()),
        Box::new(COMPENSATIONS_TOTAL.clone()),
        // Completion
        Box::new(COMPLETION_STEPS.clone()),
        Box::new(TRANSIT_DURATION.clone()),
        // Ledger
        Box::new(PACKAGES_CREATED.clone()),
    ]
}
