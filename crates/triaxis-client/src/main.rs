//! Triaxis client -- streams simulated sensor readings to the
//! collecting server, or fetches the stored history.
//!
//! Usage:
//!
//!   triaxis-client [OPTIONS]
//!
//! Options:
//!
//!   --server <ADDR>        Server address (default: 127.0.0.1:12345)
//!   --secret <SECRET>      Pre-shared cipher secret
//!   --interval-ms <MS>     Milliseconds between readings (default: 1000)
//!   --timeout-ms <MS>      History read timeout (default: none)
//!   --history              Fetch and print the stored history, then exit
//!
//! The streaming mode runs until interrupted with Ctrl+C.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use triaxis_client::{simulator, Connection};
use triaxis_types::config::ClientConfig;

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

struct CliArgs {
    server: Option<SocketAddr>,
    secret: Option<String>,
    interval_ms: Option<u64>,
    timeout_ms: Option<u64>,
    history: bool,
}

impl CliArgs {
    fn parse_from_env() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut cli = Self {
            server: None,
            secret: None,
            interval_ms: None,
            timeout_ms: None,
            history: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--server" => {
                    i += 1;
                    cli.server = args.get(i).and_then(|s| s.parse().ok());
                }
                "--secret" => {
                    i += 1;
                    cli.secret = args.get(i).cloned();
                }
                "--interval-ms" => {
                    i += 1;
                    cli.interval_ms = args.get(i).and_then(|s| s.parse().ok());
                }
                "--timeout-ms" => {
                    i += 1;
                    cli.timeout_ms = args.get(i).and_then(|s| s.parse().ok());
                }
                "--history" => {
                    cli.history = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("unknown argument: {other}");
                    eprintln!("use --help for usage information");
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        cli
    }
}

fn print_help() {
    println!(
        r#"Triaxis client - sensor reading streamer

USAGE:
    triaxis-client [OPTIONS]

OPTIONS:
    --server <ADDR>      Server address (default: 127.0.0.1:12345)
    --secret <SECRET>    Pre-shared cipher secret
    --interval-ms <MS>   Milliseconds between simulated readings (default: 1000)
    --timeout-ms <MS>    Timeout for the history response (default: wait forever)
    --history            Fetch and print the stored history, then exit
    -h, --help           Show this help

ENVIRONMENT:
    RUST_LOG             Log level filter (default: info)
"#
    );
}

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

    let cli = CliArgs::parse_from_env();

    let mut config = ClientConfig::default();
    if let Some(server) = cli.server {
        config.server_addr = server;
    }
    if let Some(ref secret) = cli.secret {
        config.shared_secret = secret.clone();
    }
    if let Some(ms) = cli.timeout_ms {
        config.request_timeout = Some(Duration::from_millis(ms));
    }

    let interval = Duration::from_millis(cli.interval_ms.unwrap_or(1000));

    let result = if cli.history {
        fetch_history(config).await
    } else {
        stream_readings(config, interval).await
    };

    if let Err(e) = result {
        tracing::error!("client error: {e}");
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// One-shot mode: request the stored history and print it.
async fn fetch_history(config: ClientConfig) -> Result<(), String> {
    let mut conn = Connection::new(config).map_err(|e| e.to_string())?;
    conn.connect().await.map_err(|e| e.to_string())?;

    let readings = conn.request_history().await.map_err(|e| e.to_string())?;
    conn.disconnect().await;

    if readings.is_empty() {
        println!("no stored readings");
        return Ok(());
    }

    println!("{} stored readings (most recent first):", readings.len());
    for reading in &readings {
        println!("  {reading}");
    }
    Ok(())
}

/// Streaming mode: forward simulated readings until Ctrl+C.
async fn stream_readings(config: ClientConfig, interval: Duration) -> Result<(), String> {
    let mut conn = Connection::new(config).map_err(|e| e.to_string())?;
    conn.connect().await.map_err(|e| e.to_string())?;

    let (reading_tx, mut reading_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sim_config = simulator::SimulatorConfig {
        interval,
        ..simulator::SimulatorConfig::default()
    };
    let sim_handle = simulator::spawn(sim_config, reading_tx, shutdown_rx);

    tracing::info!("streaming readings; press Ctrl+C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received Ctrl+C, stopping");
                break;
            }
            reading = reading_rx.recv() => {
                match reading {
                    Some(reading) => {
                        // Fire-and-forget: a failed send is reported
                        // and the stream moves on.
                        if let Err(e) = conn.send_reading(&reading).await {
                            tracing::warn!("send failed: {e}");
                        }
                    }
                    None => {
                        tracing::warn!("simulator stopped unexpectedly");
                        break;
                    }
                }
            }
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = sim_handle.await;
    conn.disconnect().await;
    Ok(())
}
