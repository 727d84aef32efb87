//! Client connection endpoint.
//!
//! One [`Connection`] owns one outbound TCP connection and moves
//! through a one-shot lifecycle: disconnected → connected →
//! disconnected. Reconnecting means creating a fresh instance; there
//! is no automatic retry.
//!
//! Live readings are fire-and-forget: one encrypted line out, no
//! acknowledgement, at-most-once delivery. The history request is the
//! only request/response exchange — it blocks the caller on a single
//! reply line, with an optional configured timeout (none by default).

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use triaxis_crypto::CipherCodec;
use triaxis_protocol::{frame, history};
use triaxis_types::config::ClientConfig;
use triaxis_types::{Reading, Result, TriaxisError};

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

struct Channels {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

/// Outbound connection to the collecting server.
pub struct Connection {
    config: ClientConfig,
    codec: CipherCodec,
    channels: Option<Channels>,
}

impl Connection {
    /// Creates a disconnected endpoint from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TriaxisError::Config`] if the configuration is
    /// invalid.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let codec = CipherCodec::new(&config.shared_secret);
        Ok(Self {
            config,
            codec,
            channels: None,
        })
    }

    /// Whether the endpoint currently holds a live connection.
    pub fn is_connected(&self) -> bool {
        self.channels.is_some()
    }

    /// Opens the outbound TCP connection.
    ///
    /// On failure the endpoint stays disconnected and the error is
    /// returned for the caller to decide retry policy; nothing is
    /// fatal to the process.
    pub async fn connect(&mut self) -> Result<()> {
        if self.channels.is_some() {
            tracing::debug!("already connected");
            return Ok(());
        }

        let addr = self.config.server_addr;
        tracing::info!(%addr, "connecting to server");
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| TriaxisError::Connect {
                reason: format!("failed to connect to {addr}: {e}"),
            })?;

        let (read_half, write_half) = stream.into_split();
        self.channels = Some(Channels {
            reader: BufReader::new(read_half),
            writer: write_half,
        });
        tracing::info!(%addr, "connected");
        Ok(())
    }

    /// Sends one live reading, fire-and-forget.
    ///
    /// A no-op with a logged warning when disconnected. A write
    /// failure is reported but not retried; delivery is at-most-once.
    pub async fn send_reading(&mut self, reading: &Reading) -> Result<()> {
        let Some(channels) = self.channels.as_mut() else {
            tracing::warn!("not connected; dropping reading {reading}");
            return Ok(());
        };

        let token = frame::encode_data(&self.codec, reading)?;
        write_line(&mut channels.writer, &token).await?;
        tracing::debug!(%reading, "sent reading");
        Ok(())
    }

    /// Requests the full stored history and blocks on the single
    /// reply line.
    ///
    /// Returns an empty list when disconnected, when the server closes
    /// the stream without replying, and when the server reports
    /// `NO_DATA` or an `ERROR:` body — those cases differ only in what
    /// gets logged. A configured `request_timeout` bounds the wait;
    /// without one the call waits indefinitely.
    pub async fn request_history(&mut self) -> Result<Vec<Reading>> {
        let timeout = self.config.request_timeout;
        let Some(channels) = self.channels.as_mut() else {
            tracing::warn!("not connected; cannot request history");
            return Ok(Vec::new());
        };

        let token = frame::encode_history_request(&self.codec)?;
        write_line(&mut channels.writer, &token).await?;
        tracing::debug!("awaiting history response");

        let mut line = String::new();
        let read = channels.reader.read_line(&mut line);
        let n = match timeout {
            Some(duration) => tokio::time::timeout(duration, read)
                .await
                .map_err(|_| TriaxisError::Transport {
                    reason: format!("history response timed out after {duration:?}"),
                })?,
            None => read.await,
        }
        .map_err(|e| TriaxisError::Transport {
            reason: format!("failed to read history response: {e}"),
        })?;

        if n == 0 {
            tracing::warn!("server closed the stream without a history response");
            return Ok(Vec::new());
        }

        let body = self.codec.decrypt(line.trim_end())?;
        if body == history::NO_DATA {
            tracing::info!("server has no stored readings");
        } else if body.starts_with(history::ERROR_PREFIX) {
            tracing::warn!(%body, "server reported a history failure");
        }

        let readings = history::decode_body(&body);
        tracing::info!(count = readings.len(), "received history");
        Ok(readings)
    }

    /// Closes the connection. Idempotent; close errors are swallowed
    /// after logging.
    pub async fn disconnect(&mut self) {
        if let Some(mut channels) = self.channels.take() {
            if let Err(e) = channels.writer.shutdown().await {
                tracing::debug!(%e, "error while closing connection");
            }
            tracing::info!("disconnected");
        }
    }
}

/// Writes one `\n`-terminated wire token.
async fn write_line(writer: &mut OwnedWriteHalf, token: &str) -> Result<()> {
    let map = |e: std::io::Error| TriaxisError::Transport {
        reason: format!("write failed: {e}"),
    };
    writer.write_all(token.as_bytes()).await.map_err(map)?;
    writer.write_all(b"\n").await.map_err(map)?;
    writer.flush().await.map_err(map)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
