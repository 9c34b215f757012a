//! Todo Server
//!
//! Loads configuration, opens the backing store (retrying while it starts up)
//! and serves the `todos` resource until interrupted.

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use todo_server::config::Config;
use todo_server::{app, storage, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Todo Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    info!("Loading configuration...");
    let config = Config::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, store={}",
        config.http.bind_address, config.store.target
    );

    let store = storage::open(&config.store)
        .await
        .context("Failed to open backing store")?;
    info!("Database ready ({})", store.backend());

    let app = app(AppState::new(store), &config.http);

    let listener = tokio::net::TcpListener::bind(config.http.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Server listening on {}", config.http.bind_address);
    info!("Endpoints:");
    info!("  GET    /todos");
    info!("  GET    /todos/<id>");
    info!("  POST   /todos        body: {{title}}");
    info!("  PUT    /todos/<id>   body: {{title?, completed?}}");
    info!("  DELETE /todos/<id>");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
