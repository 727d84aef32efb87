//! Connection acceptor.
//!
//! [`TelemetryServer::start`] binds the listener and spawns the accept
//! loop as a tokio task, returning a [`ServerHandle`] with the bound
//! address and the loop's `JoinHandle`. Binding is the only fatal
//! failure; after that the loop accepts indefinitely, spawning one
//! session task per connection and never waiting on worker completion.
//!
//! # Graceful shutdown
//!
//! The loop watches a `tokio::sync::watch::Receiver<bool>`. When the
//! value becomes `true` the acceptor stops taking new connections and
//! exits; in-flight sessions run to their natural end.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use triaxis_crypto::CipherCodec;
use triaxis_storage::ReadingBackend;
use triaxis_types::config::ServerConfig;
use triaxis_types::{Result, TriaxisError};

use crate::session;

// ---------------------------------------------------------------------------
// ServerHandle
// ---------------------------------------------------------------------------

/// Running-server handle.
pub struct ServerHandle {
    /// Address the listener actually bound (resolves port 0).
    pub local_addr: SocketAddr,
    /// Accept-loop task; completes on shutdown or unrecoverable
    /// accept error.
    pub join: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// TelemetryServer
// ---------------------------------------------------------------------------

/// Manages the lifecycle of the collecting server.
pub struct TelemetryServer;

impl TelemetryServer {
    /// Binds the listener and starts the accept loop.
    ///
    /// # Parameters
    ///
    /// - `config` — listen address and pre-shared cipher secret.
    /// - `backend` — the shared persistence backend (cloned per session).
    /// - `shutdown_rx` — watch channel that signals shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`TriaxisError::Config`] if config validation fails, or
    /// [`TriaxisError::Transport`] if the listener cannot bind — the
    /// one process-fatal failure of the server role.
    pub async fn start(
        config: ServerConfig,
        backend: Arc<dyn ReadingBackend>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Result<ServerHandle> {
        config.validate()?;

        let listener = TcpListener::bind(config.listen_addr)
            .await
            .map_err(|e| TriaxisError::Transport {
                reason: format!("failed to bind {}: {e}", config.listen_addr),
            })?;
        let local_addr = listener.local_addr().map_err(|e| TriaxisError::Transport {
            reason: format!("failed to read bound address: {e}"),
        })?;

        let codec = Arc::new(CipherCodec::new(&config.shared_secret));
        tracing::info!(%local_addr, "telemetry server listening");

        let join = tokio::spawn(accept_loop(listener, codec, backend, shutdown_rx));
        Ok(ServerHandle { local_addr, join })
    }
}

// ---------------------------------------------------------------------------
// Accept loop
// ---------------------------------------------------------------------------

async fn accept_loop(
    listener: TcpListener,
    codec: Arc<CipherCodec>,
    backend: Arc<dyn ReadingBackend>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = wait_for_shutdown(&mut shutdown_rx) => {
                tracing::info!("telemetry server shutting down");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        tracing::info!(%peer, "client connected");
                        tokio::spawn(session::run(
                            stream,
                            peer,
                            Arc::clone(&codec),
                            Arc::clone(&backend),
                        ));
                    }
                    Err(e) => {
                        // An accept failure here is not per-connection;
                        // the listener itself is broken.
                        tracing::error!(%e, "accept failed; stopping server");
                        break;
                    }
                }
            }
        }
    }
}

/// Resolves when the shutdown watch fires.
async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
