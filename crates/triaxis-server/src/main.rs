//! Triaxis server daemon -- collects sensor readings over TCP and
//! answers history requests.
//!
//! Usage:
//!
//!   triaxis-server [OPTIONS]
//!
//! Options:
//!
//!   --listen <ADDR>    Listen address (default: 127.0.0.1:12345)
//!   --db-path <PATH>   Reading store directory (default: ./triaxis-data)
//!   --secret <SECRET>  Pre-shared cipher secret
//!   --config <PATH>    Load settings from JSON config file
//!
//! The daemon runs until interrupted with Ctrl+C (SIGINT/SIGTERM).

use std::sync::Arc;

use tokio::sync::watch;

use triaxis_server::TelemetryServer;
use triaxis_storage::{ReadingBackend, ReadingStore};
use triaxis_types::config::ServerConfig;

mod cli;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = cli::CliArgs::parse_from_env();

    let daemon_config = match &args.config_path {
        Some(path) => match cli::DaemonConfig::load(path) {
            Ok(cfg) => cfg.merge_cli(&args),
            Err(e) => {
                tracing::error!("failed to load config file: {e}");
                std::process::exit(1);
            }
        },
        None => cli::DaemonConfig::from_cli(&args),
    };

    if let Err(e) = run_daemon(daemon_config).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Daemon main logic
// ---------------------------------------------------------------------------

async fn run_daemon(cfg: cli::DaemonConfig) -> Result<(), String> {
    // 1. Reading store.
    let store = Arc::new(
        ReadingStore::open(&cfg.db_path)
            .map_err(|e| format!("failed to open reading store: {e}"))?,
    );
    tracing::info!(
        db_path = %cfg.db_path.display(),
        stored = store.len(),
        "reading store opened"
    );
    let backend: Arc<dyn ReadingBackend> = Arc::clone(&store) as Arc<dyn ReadingBackend>;

    // 2. Telemetry server.
    let server_config = ServerConfig {
        listen_addr: cfg.listen_addr,
        shared_secret: cfg.secret,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = TelemetryServer::start(server_config, backend, shutdown_rx)
        .await
        .map_err(|e| format!("server start failed: {e}"))?;

    println!("Triaxis server listening on {}", handle.local_addr);
    println!("Press Ctrl+C to stop");

    // 3. Wait for shutdown.
    let mut join = handle.join;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received Ctrl+C, shutting down...");
            let _ = shutdown_tx.send(true);
            let _ = (&mut join).await;
        }
        result = &mut join => {
            // The accept loop only exits on its own for an
            // unrecoverable accept error.
            if let Err(e) = result {
                tracing::error!(%e, "accept loop panicked");
            }
            store.flush().map_err(|e| e.to_string())?;
            return Err("accept loop exited unexpectedly".into());
        }
    }

    store.flush().map_err(|e| e.to_string())?;
    tracing::info!("server stopped");
    Ok(())
}
