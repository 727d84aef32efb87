//! CLI argument parsing and config file support for the server
//! daemon.
//!
//! The daemon can be configured via CLI flags, a JSON config file, or
//! a combination of both (CLI overrides config file).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use triaxis_types::config::default_listen_addr;
use triaxis_types::config::DEFAULT_SHARED_SECRET;

// ---------------------------------------------------------------------------
// CLI arguments (manual parsing, no clap dependency)
// ---------------------------------------------------------------------------

/// Parsed command-line arguments.
pub struct CliArgs {
    pub listen_addr: Option<SocketAddr>,
    pub db_path: Option<PathBuf>,
    pub secret: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl CliArgs {
    /// Parses CLI arguments from `std::env::args`.
    pub fn parse_from_env() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut cli = Self {
            listen_addr: None,
            db_path: None,
            secret: None,
            config_path: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--listen" => {
                    i += 1;
                    cli.listen_addr = args.get(i).and_then(|s| s.parse().ok());
                }
                "--db-path" => {
                    i += 1;
                    cli.db_path = args.get(i).map(PathBuf::from);
                }
                "--secret" => {
                    i += 1;
                    cli.secret = args.get(i).cloned();
                }
                "--config" => {
                    i += 1;
                    cli.config_path = args.get(i).map(PathBuf::from);
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

// ---------------------------------------------------------------------------
// Config file (JSON)
// ---------------------------------------------------------------------------

/// JSON config file format.
///
/// Example `triaxis-server.json`:
/// ```json
/// {
///   "listen_addr": "0.0.0.0:12345",
///   "db_path": "/var/lib/triaxis/readings",
///   "secret": "a-better-shared-secret"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DaemonConfigFile {
    pub listen_addr: Option<SocketAddr>,
    pub db_path: Option<String>,
    pub secret: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved config (all defaults applied)
// ---------------------------------------------------------------------------

/// Fully resolved daemon configuration with all defaults applied.
pub struct DaemonConfig {
    pub listen_addr: SocketAddr,
    pub db_path: PathBuf,
    pub secret: String,
}

impl DaemonConfig {
    /// Build config purely from CLI args with defaults.
    pub fn from_cli(cli: &CliArgs) -> Self {
        Self {
            listen_addr: cli.listen_addr.unwrap_or_else(default_listen_addr),
            db_path: cli.db_path.clone().unwrap_or_else(default_db_path),
            secret: cli
                .secret
                .clone()
                .unwrap_or_else(|| DEFAULT_SHARED_SECRET.to_string()),
        }
    }

    /// Load config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config file: {e}"))?;

        let file: DaemonConfigFile = serde_json::from_str(&text)
            .map_err(|e| format!("invalid config JSON: {e}"))?;

        Ok(Self {
            listen_addr: file.listen_addr.unwrap_or_else(default_listen_addr),
            db_path: file
                .db_path
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            secret: file
                .secret
                .unwrap_or_else(|| DEFAULT_SHARED_SECRET.to_string()),
        })
    }

    /// Merge CLI overrides onto a config-file base.
    pub fn merge_cli(mut self, cli: &CliArgs) -> Self {
        if let Some(addr) = cli.listen_addr {
            self.listen_addr = addr;
        }
        if let Some(ref path) = cli.db_path {
            self.db_path = path.clone();
        }
        if let Some(ref secret) = cli.secret {
            self.secret = secret.clone();
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Default on-disk location of the reading store.
fn default_db_path() -> PathBuf {
    PathBuf::from("triaxis-data")
}

fn print_help() {
    println!(
        r#"Triaxis server - sensor telemetry collector

USAGE:
    triaxis-server [OPTIONS]

OPTIONS:
    --listen <ADDR>    Listen address (default: 127.0.0.1:12345)
    --db-path <PATH>   Reading store directory (default: ./triaxis-data)
    --secret <SECRET>  Pre-shared cipher secret
    --config <PATH>    Load settings from JSON config file
    -h, --help         Show this help

EXAMPLES:
    # Listen on all interfaces
    triaxis-server --listen 0.0.0.0:12345

    # Use config file
    triaxis-server --config /etc/triaxis/server.json

ENVIRONMENT:
    RUST_LOG           Log level filter (default: info)
"#
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
