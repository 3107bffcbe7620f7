//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Planet Express server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Resource availability (collected dynamically)
//! - Packages by status and completion tasks in flight (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use regex_lite::Regex;
use tracing::error;

use planet_express_core::{PackageStatus, ResourceKind};

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "planet_express_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("planet_express_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "planet_express_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Dispatch Metrics (collected dynamically)
// =============================================================================

/// Free resources by kind.
pub static RESOURCES_AVAILABLE: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "planet_express_resources_available",
            "Resources currently free to claim",
        ),
        &["kind"],
    )
    .unwrap()
});

/// Packages in the local ledger by status.
pub static PACKAGES_BY_STATUS: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "planet_express_packages_by_status",
            "Current package count by status",
        ),
        &["status"],
    )
    .unwrap()
});

/// Completion tasks that have not finished yet.
pub static COMPLETIONS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "planet_express_completions_in_flight",
        "Deliveries currently in transit",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Dispatch
    registry
        .register(Box::new(RESOURCES_AVAILABLE.clone()))
        .unwrap();
    registry
        .register(Box::new(PACKAGES_BY_STATUS.clone()))
        .unwrap();
    registry
        .register(Box::new(COMPLETIONS_IN_FLIGHT.clone()))
        .unwrap();

    // Core metrics (pools, saga, completion, ledger)
    for metric in planet_express_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the pools and ledger as they
/// are right now.
pub fn collect_dynamic_metrics(state: &AppState) {
    RESOURCES_AVAILABLE
        .with_label_values(&[ResourceKind::Crew.as_str()])
        .set(state.crew().available_count() as i64);
    RESOURCES_AVAILABLE
        .with_label_values(&[ResourceKind::Ship.as_str()])
        .set(state.ship().available_count() as i64);

    COMPLETIONS_IN_FLIGHT.set(state.orchestrator().in_flight() as i64);

    let packages = state.ledger().list();
    for status in [
        PackageStatus::Pending,
        PackageStatus::InTransit,
        PackageStatus::Delivered,
    ] {
        let count = packages.iter().filter(|p| p.status == status).count();
        PACKAGES_BY_STATUS
            .with_label_values(&[status.as_str()])
            .set(count as i64);
    }
}

static PACKAGE_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/[A-Za-z0-9]{16}(/|$)").unwrap());
static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    let result = PACKAGE_ID_REGEX.replace_all(path, "/{id}$1");
    let result = NUMERIC_REGEX.replace_all(&result, "/{id}$1");
    result.to_string()
}
