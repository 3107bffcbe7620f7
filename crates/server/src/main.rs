use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planet_express_core::{build_http_client, load_config, load_config_from_env, validate_config};
use planet_express_server::api::create_router;
use planet_express_server::state::AppState;
use planet_express_server::traffic::TrafficGenerator;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("PLANET_EXPRESS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        warn!(
            "Config file {:?} not found, using defaults and environment overrides",
            config_path
        );
        load_config_from_env().context("Failed to load config from environment")?
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        "Transit time: {}-{} ms",
        config.dispatch.transit_min_ms, config.dispatch.transit_max_ms
    );

    // Create app state
    let state = Arc::new(AppState::from_config(config.clone())?);
    let orchestrator = Arc::clone(state.orchestrator());

    // Start traffic generator if enabled
    let traffic = if config.traffic.enabled {
        let client = build_http_client(Duration::from_secs(config.services.timeout_secs))
            .context("Failed to build traffic generator client")?;
        Some(TrafficGenerator::new(client, &config.traffic).spawn())
    } else {
        info!("Traffic generator disabled in config");
        None
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    if let Some(traffic) = traffic {
        traffic.stop().await;
    }

    // Finish deliveries still in transit so no crew or ship stays claimed
    let reports = orchestrator.shutdown().await;
    let failed = reports.iter().filter(|r| !r.is_clean()).count();
    info!(
        "Completed {} outstanding deliveries ({} with failures)",
        reports.len(),
        failed
    );

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
