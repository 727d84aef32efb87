//! Endpoint configuration with sensible defaults.
//!
//! Both endpoints are configured here: the client's server address and
//! request timeout, the server's listen address, and the pre-shared
//! cipher secret that both sides derive the wire key from. The secret
//! is a configuration value injected into each cipher codec at
//! construction, never a hidden global.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, TriaxisError};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default pre-shared secret. Must be identical on both endpoints;
/// each side derives the 16-byte wire key from it by digest.
pub const DEFAULT_SHARED_SECRET: &str = "UNISON_MONITOR_KEY";

/// Default TCP port the collecting server listens on.
pub const DEFAULT_PORT: u16 = 12345;

/// Default server address the client connects to.
pub fn default_server_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
}

/// Default listen address for the server (loopback only).
pub fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Configuration for the client-side connection endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Address of the collecting server.
    pub server_addr: SocketAddr,

    /// Pre-shared cipher secret.
    pub shared_secret: String,

    /// Timeout for the single blocking history read.
    ///
    /// `None` means wait indefinitely, which is the base protocol
    /// behavior; set a duration to harden against a stalled server.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: default_server_addr(),
            shared_secret: DEFAULT_SHARED_SECRET.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.shared_secret.is_empty() {
            return Err(TriaxisError::Config {
                reason: "shared_secret must not be empty".into(),
            });
        }
        if let Some(timeout) = self.request_timeout {
            if timeout.is_zero() {
                return Err(TriaxisError::Config {
                    reason: "request_timeout must be greater than zero when set".into(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Configuration for the collecting server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the acceptor binds its listening socket to.
    ///
    /// Port 0 binds an ephemeral port; the bound address is reported
    /// back on the server handle.
    pub listen_addr: SocketAddr,

    /// Pre-shared cipher secret.
    pub shared_secret: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            shared_secret: DEFAULT_SHARED_SECRET.to_string(),
        }
    }
}

impl ServerConfig {
    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.shared_secret.is_empty() {
            return Err(TriaxisError::Config {
                reason: "shared_secret must not be empty".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_addr.port(), DEFAULT_PORT);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn default_server_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.listen_addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn empty_secret_rejected() {
        let client = ClientConfig {
            shared_secret: String::new(),
            ..ClientConfig::default()
        };
        assert!(client.validate().is_err());

        let server = ServerConfig {
            shared_secret: String::new(),
            ..ServerConfig::default()
        };
        assert!(server.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = ClientConfig {
            request_timeout: Some(Duration::ZERO),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn both_defaults_share_one_secret() {
        // Key derivation only matches when both endpoints hold the
        // identical secret.
        assert_eq!(
            ClientConfig::default().shared_secret,
            ServerConfig::default().shared_secret
        );
    }
}
