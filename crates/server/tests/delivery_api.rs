//! Delivery endpoint tests against the in-process router.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use common::{fixtures, test_config, TestFixture, FAST_TRANSIT};
use planet_express_core::{
    testing::MockLedger, CrewMemberConfig, DeliveryOrchestrator, DispatchConfig, MemoryLedger,
    PackageLedger, ResourceService, ServiceError,
};
use planet_express_server::state::AppState;

fn slurm() -> serde_json::Value {
    json!({
        "recipient": "Zoidberg",
        "address": "New New York",
        "contents": "Slurm"
    })
}

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_delivery_lifecycle() {
    let fixture = TestFixture::new();

    let response = fixture.post("/api/v1/deliveries", slurm()).await;
    assert_status!(response, StatusCode::OK);

    let ticket = &response.body;
    assert_eq!(ticket["crew"]["name"], "Fry");
    assert_eq!(ticket["crew"]["role"], "Delivery Boy");
    assert_eq!(ticket["ship"]["name"], "Planet Express Ship");
    assert_eq!(ticket["package"]["recipient"], "Zoidberg");
    assert_eq!(ticket["package"]["status"], "pending");

    let id = ticket["package"]["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 16);

    let package = fixture.get(&format!("/api/v1/packages/{}", id)).await;
    assert_status!(package, StatusCode::OK);
    assert_eq!(package.body["status"], "pending");

    let ship = fixture.get("/api/v1/ship/status").await;
    assert_eq!(ship.body[0]["available"], false);

    fixture.wait_idle().await;

    let package = fixture.get(&format!("/api/v1/packages/{}", id)).await;
    assert_eq!(package.body["status"], "delivered");

    let crew = fixture.get("/api/v1/crew").await;
    let roster = crew.body.as_array().unwrap();
    assert_eq!(roster.len(), 3);
    assert!(roster.iter().all(|member| member["available"] == true));

    let ship = fixture.get("/api/v1/ship/status").await;
    assert_eq!(ship.body[0]["available"], true);
}

#[tokio::test]
async fn test_delivery_missing_fields() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/api/v1/deliveries", json!({ "recipient": "Mom" }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("address, contents"));

    // Nothing was claimed or recorded
    assert_eq!(fixture.state.crew().available_count(), 3);
    assert_eq!(fixture.state.ship().available_count(), 1);
    assert!(fixture.state.ledger().is_empty());
}

#[tokio::test]
async fn test_delivery_malformed_json() {
    let fixture = TestFixture::new();

    let response = fixture
        .post_raw("/api/v1/deliveries", r#"{"recipient": "Mom""#)
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
    assert_eq!(fixture.state.crew().available_count(), 3);
}

#[tokio::test]
async fn test_delivery_wrong_method() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/deliveries").await;
    assert_status!(response, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_delivery_crew_exhausted() {
    let mut config = test_config(std::time::Duration::from_secs(60));
    config.crew.members = vec![CrewMemberConfig {
        name: "Fry".to_string(),
        role: "Delivery Boy".to_string(),
    }];
    let fixture = TestFixture::with_config(config);

    let first = fixture.post("/api/v1/deliveries", slurm()).await;
    assert_status!(first, StatusCode::OK);

    let second = fixture.post("/api/v1/deliveries", slurm()).await;
    assert_status!(second, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(second.body["error"], "no crew available");
    assert_eq!(fixture.state.ledger().len(), 1);

    fixture.state.orchestrator().shutdown().await;
}

#[tokio::test]
async fn test_delivery_ship_exhausted_releases_crew() {
    let fixture = TestFixture::new();

    let reserved = fixture.post_empty("/api/v1/ship/reserve").await;
    assert_status!(reserved, StatusCode::OK);

    let response = fixture.post("/api/v1/deliveries", slurm()).await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "no ship available");

    let crew = fixture.get("/api/v1/crew").await;
    assert!(crew
        .body
        .as_array()
        .unwrap()
        .iter()
        .all(|member| member["available"] == true));
    assert!(fixture.state.ledger().is_empty());
}

#[tokio::test]
async fn test_delivery_ledger_failure_releases_everything() {
    let crew = Arc::new(fixtures::full_crew());
    let ship = Arc::new(fixtures::planet_express_ship());
    let mock_ledger = Arc::new(MockLedger::new());
    mock_ledger
        .set_create_error(ServiceError::Unavailable("package service down".to_string()))
        .await;

    let orchestrator = Arc::new(DeliveryOrchestrator::new(
        DispatchConfig::with_fixed_transit(FAST_TRANSIT),
        Arc::clone(&crew) as Arc<dyn ResourceService>,
        Arc::clone(&ship) as Arc<dyn ResourceService>,
        Arc::clone(&mock_ledger) as Arc<dyn PackageLedger>,
    ));
    let state = Arc::new(AppState::new(
        test_config(FAST_TRANSIT),
        orchestrator,
        Arc::clone(&crew),
        Arc::clone(&ship),
        Arc::new(MemoryLedger::new()),
    ));
    let fixture = TestFixture::with_state(state);

    let response = fixture.post("/api/v1/deliveries", slurm()).await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.body["error"],
        "service unavailable: package service down"
    );

    assert_eq!(crew.available_count(), 3);
    assert_eq!(ship.available_count(), 1);
    assert!(mock_ledger.ledger().is_empty());
}

#[tokio::test]
async fn test_deliveries_reuse_freed_ship() {
    let fixture = TestFixture::new();

    for _ in 0..3 {
        let response = fixture.post("/api/v1/deliveries", slurm()).await;
        assert_status!(response, StatusCode::OK);
        fixture.wait_idle().await;
    }

    let packages = fixture.get("/api/v1/packages").await;
    let packages = packages.body.as_array().unwrap();
    assert_eq!(packages.len(), 3);
    assert!(packages.iter().all(|p| p["status"] == "delivered"));
}

#[tokio::test]
async fn test_config_endpoint() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["crew"]["members"][1]["name"], "Leela");
    assert_eq!(response.body["ship"]["fleet"][0]["name"], "Planet Express Ship");
    assert_eq!(
        response.body["dispatch"]["transit_max_ms"],
        FAST_TRANSIT.as_millis() as u64
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();

    let response = fixture.post("/api/v1/deliveries", slurm()).await;
    assert_status!(response, StatusCode::OK);

    let metrics = fixture.get("/metrics").await;
    assert_status!(metrics, StatusCode::OK);
    assert!(metrics.text.contains("planet_express_deliveries_total"));
    assert!(metrics.text.contains("planet_express_resources_available"));
    assert!(metrics.text.contains("planet_express_http_requests_total"));

    fixture.wait_idle().await;
}

