use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stagedoor::config::StagedoorConfig;
use stagedoor::handlers::{router, AppState};
use stagedoor::http::session::SessionStore;
use stagedoor::images::MemoryImageStore;
use stagedoor::mail::LogMailer;
use stagedoor::payment::UnconfiguredProvider;
use stagedoor::ratelimit::RateLimitRegistry;
use stagedoor::store::MemoryStore;

#[derive(Parser, Debug)]
#[command(name = "stagedoor")]
#[command(about = "Storefront backend with per-client rate limiting")]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the configured HTTP listen address
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting Stagedoor Storefront Service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => StagedoorConfig::from_file(path)?,
        None => StagedoorConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.server.http_addr = listen;
    }
    info!(http_addr = %config.server.http_addr, "Configuration loaded");

    // Initialize the rate limiter and its eviction sweep
    let registry = Arc::new(RateLimitRegistry::new(config.rate_limit.registry_config()));
    let sweeper = registry.clone().start_sweeper();
    info!("Rate limit registry initialized");

    let state = Arc::new(AppState {
        store: Arc::new(MemoryStore::new()),
        payments: Arc::new(UnconfiguredProvider),
        mailer: Arc::new(LogMailer),
        images: Arc::new(MemoryImageStore::new()),
        sessions: SessionStore::new(config.auth.session_ttl()),
        auth: config.auth.clone(),
    });

    let app = router(state, registry);

    let listener = tokio::net::TcpListener::bind(config.server.http_addr).await?;
    info!("Starting HTTP server on {}", config.server.http_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // Stop the eviction sweep before exiting so shutdown is deterministic.
    sweeper.shutdown().await;

    info!("Stagedoor Storefront Service stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
