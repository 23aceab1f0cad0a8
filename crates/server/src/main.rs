use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sktorrent_core::{
    load_config, validate_config, CinemetaClient, HttpSession, MetadataLookup, SanitizedConfig,
    StreamResolver, TrackerClient, TrackerSession,
};
use sktorrent_server::{api::create_router, state::AppState};

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
    let config_path = std::env::var("SKTORRENT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Tracker: {}", config.tracker.base_url);
    info!("Metadata: {}", config.metadata.base_url);
    if !config.tracker.has_credentials() {
        warn!("Tracker credentials are not set; searches will hit the login page");
    }
    if let Ok(json) = serde_json::to_string(&SanitizedConfig::from(&config)) {
        info!("Effective config: {}", json);
    }

    // Tracker session carries the login cookies on every request
    let session: Arc<dyn TrackerSession> = Arc::new(
        HttpSession::new(&config.tracker).context("Failed to create tracker session")?,
    );
    let tracker = TrackerClient::new(session, &config.tracker);

    let metadata: Arc<dyn MetadataLookup> = Arc::new(
        CinemetaClient::new(&config.metadata).context("Failed to create metadata client")?,
    );
    info!("Using metadata source: {}", metadata.name());

    let resolver = Arc::new(StreamResolver::new(
        metadata,
        tracker,
        config.resolver.clone(),
    ));

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), resolver));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);
    info!("Manifest: http://{}/manifest.json", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
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
