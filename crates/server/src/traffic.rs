//! Synthetic delivery traffic.
//!
//! Posts a random Futurama-themed delivery request to the configured endpoint
//! at a fixed interval until stopped.

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::{Client, StatusCode};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use planet_express_core::{DeliveryRequest, TrafficConfig};

const RECIPIENTS: &[&str] = &[
    "Philip J. Fry",
    "Turanga Leela",
    "Bender Bending Rodríguez",
    "Amy Wong",
    "Hermes Conrad",
    "Professor Farnsworth",
    "Zapp Brannigan",
    "Kif Kroker",
    "Mom",
    "Elzar",
    "Scruffy",
    "Robot Santa",
    "Calculon",
];

const ADDRESSES: &[&str] = &[
    "New New York",
    "Mars Vegas",
    "Neptune",
    "Omicron Persei 8",
    "Robonia",
    "Luna Park",
    "Doop Headquarters",
    "Sewer City",
    "Central Bureaucracy",
];

const CONTENTS: &[&str] = &[
    "Slurm",
    "Popplers",
    "Shiny metal parts",
    "Career chips",
    "Dark matter",
    "Mutant fish",
    "Love potion",
    "Explosives",
    "Robot oil",
    "Hyper-chicken eggs",
];

fn pick(list: &[&str]) -> String {
    list.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}

/// Build a random delivery request.
pub fn random_request() -> DeliveryRequest {
    DeliveryRequest::new(pick(RECIPIENTS), pick(ADDRESSES), pick(CONTENTS))
}

/// Background loop posting synthetic deliveries.
pub struct TrafficGenerator {
    client: Client,
    target_url: String,
    interval: Duration,
}

impl TrafficGenerator {
    pub fn new(client: Client, config: &TrafficConfig) -> Self {
        Self {
            client,
            target_url: config.target_url.clone(),
            interval: Duration::from_millis(config.interval_ms),
        }
    }

    /// Send one random delivery request and return the response status.
    pub async fn send_once(&self) -> Result<StatusCode, reqwest::Error> {
        let request = random_request();
        let response = self
            .client
            .post(&self.target_url)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        info!(
            "Sent delivery of {} to {} at {} | Status: {}",
            request.contents,
            request.recipient,
            request.address,
            status.as_u16()
        );
        Ok(status)
    }

    /// Run until `shutdown` flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Traffic generator sending requests to {} every {:?}",
            self.target_url, self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.send_once().await {
                        error!("Failed to send delivery: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    // A dropped handle stops the loop as well.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Traffic generator stopped");
    }

    /// Spawn the loop onto the current runtime.
    pub fn spawn(self) -> TrafficHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(self.run(stop_rx));
        TrafficHandle { stop_tx, handle }
    }
}

/// Handle to a running traffic generator.
pub struct TrafficHandle {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TrafficHandle {
    /// Stop the loop and wait for it to exit.
    pub async fn stop(self) {
        self.stop_tx.send_replace(true);
        if let Err(e) = self.handle.await {
            error!("Traffic generator task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_random_request_draws_from_lists() {
        for _ in 0..50 {
            let request = random_request();
            assert!(RECIPIENTS.contains(&request.recipient.as_str()));
            assert!(ADDRESSES.contains(&request.address.as_str()));
            assert!(CONTENTS.contains(&request.contents.as_str()));
            assert!(request.validate().is_ok());
        }
    }

    #[tokio::test]
    async fn test_send_once_unreachable_target() {
        let config = TrafficConfig {
            enabled: true,
            // Port 9 (discard) is not expected to be listening
            target_url: "http://127.0.0.1:9/api/v1/deliveries".to_string(),
            interval_ms: 10,
        };
        let generator = TrafficGenerator::new(Client::new(), &config);
        assert!(generator.send_once().await.is_err());
    }

    #[tokio::test]
    async fn test_generator_posts_until_stopped() {
        let received = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&received);
        let app = Router::new().route(
            "/api/v1/deliveries",
            post(move |Json(request): Json<DeliveryRequest>| {
                let counter = Arc::clone(&counter);
                async move {
                    assert!(request.validate().is_ok());
                    counter.fetch_add(1, Ordering::SeqCst);
                    AxumStatus::OK
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = TrafficConfig {
            enabled: true,
            target_url: format!("http://{}/api/v1/deliveries", addr),
            interval_ms: 20,
        };
        let handle = TrafficGenerator::new(Client::new(), &config).spawn();

        tokio::time::timeout(Duration::from_secs(5), async {
            while received.load(Ordering::SeqCst) < 3 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("generator should keep posting");

        tokio::time::timeout(Duration::from_secs(5), handle.stop())
            .await
            .expect("generator should stop promptly");

        let after_stop = received.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(received.load(Ordering::SeqCst), after_stop);
    }
}
