//! Session worker: one per accepted connection.
//!
//! A session reads encrypted lines until end-of-stream or a read
//! error, dispatching each decrypted line by command prefix. Failures
//! stay inside the session: an undecryptable frame or a malformed
//! reading is logged and dropped, a backend write failure is logged
//! without a reply (the live path is fire-and-forget on both ends),
//! and a backend read failure is reported to the client as an
//! encrypted `ERROR:` body. Only a write failure on the reply path
//! ends the session, and it ends that session alone.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;

use triaxis_crypto::CipherCodec;
use triaxis_protocol::{frame, record, Command};
use triaxis_storage::ReadingBackend;
use triaxis_types::Capture;

/// Runs one session to completion. Never returns an error: every
/// outcome is handled (and logged) locally so the acceptor has
/// nothing to supervise.
pub async fn run(
    stream: TcpStream,
    peer: SocketAddr,
    codec: Arc<CipherCodec>,
    backend: Arc<dyn ReadingBackend>,
) {
    let (read_half, write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    let mut writer = write_half;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(%peer, %e, "read error; ending session");
                break;
            }
        };

        let plaintext = match codec.decrypt(&line) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                // A bad frame does not kill the session.
                tracing::warn!(%peer, %e, "dropping undecryptable frame");
                continue;
            }
        };

        match Command::parse(&plaintext) {
            Some(Command::Data(body)) => {
                handle_data(peer, body, backend.as_ref());
            }
            Some(Command::HistoricalRequest(filter)) => {
                // The filter suffix is an extension point; today every
                // request returns the full history.
                tracing::info!(%peer, filter, "history requested");
                if handle_history(&mut writer, &codec, backend.as_ref())
                    .await
                    .is_err()
                {
                    tracing::warn!(%peer, "failed to write history reply; ending session");
                    break;
                }
            }
            None => {
                tracing::trace!(%peer, %plaintext, "ignoring unknown command");
            }
        }
    }

    tracing::info!(%peer, "client disconnected");
}

/// Live-data path: parse, stamp, store. No reply in any outcome.
fn handle_data(peer: SocketAddr, body: &str, backend: &dyn ReadingBackend) {
    let reading = match record::parse_live(body) {
        Ok(reading) => reading,
        Err(e) => {
            tracing::warn!(%peer, %e, "dropping malformed reading");
            return;
        }
    };

    let capture = Capture::now();
    match backend.store(reading.x, reading.y, reading.z, &capture.date, &capture.time) {
        Ok(()) => tracing::debug!(%peer, %reading, "stored reading"),
        Err(e) => tracing::error!(%peer, %e, "failed to store reading"),
    }
}

/// History path: fetch, render, encrypt, write one reply line.
///
/// A backend failure becomes an encrypted `ERROR:` body; a cipher
/// failure is logged and the reply skipped. Only the write result is
/// propagated — a dead reply channel is the session's problem.
async fn handle_history(
    writer: &mut OwnedWriteHalf,
    codec: &CipherCodec,
    backend: &dyn ReadingBackend,
) -> std::io::Result<()> {
    let token = match backend.fetch_all() {
        Ok(records) => {
            tracing::info!(count = records.len(), "sending history");
            frame::encode_history_response(codec, &records)
        }
        Err(e) => {
            tracing::error!(%e, "history fetch failed");
            frame::encode_error_response(codec, "database read failed")
        }
    };

    let token = match token {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(%e, "failed to encrypt history reply");
            return Ok(());
        }
    };

    writer.write_all(token.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
