//! Historical bulk-record body encode/decode.
//!
//! The server answers a history request with a single line whose
//! decrypted body is either every stored record rendered and joined
//! with `|`, the literal `NO_DATA` when the store is empty, or
//! `ERROR:<reason>` when the backend read failed.

use triaxis_types::Reading;

use crate::record;

/// Separator between records in the history body.
pub const RECORD_DELIMITER: char = '|';

/// Body sent when the store holds no records.
pub const NO_DATA: &str = "NO_DATA";

/// Prefix of a server-reported failure body.
pub const ERROR_PREFIX: &str = "ERROR:";

// ---------------------------------------------------------------------------
// Encoding (server side)
// ---------------------------------------------------------------------------

/// Renders the history body from records in fetch order
/// (most-recent-first).
///
/// Backend records always carry a capture stamp; an unstamped reading
/// has no historical form and is skipped.
pub fn encode_body(records: &[Reading]) -> String {
    let rendered: Vec<String> = records
        .iter()
        .filter_map(|reading| record::render_historical(reading).ok())
        .collect();

    if rendered.is_empty() {
        NO_DATA.to_string()
    } else {
        rendered.join(&RECORD_DELIMITER.to_string())
    }
}

/// Renders an error body the client recognizes as a reported server
/// failure.
pub fn encode_error_body(reason: &str) -> String {
    format!("{ERROR_PREFIX} {reason}")
}

// ---------------------------------------------------------------------------
// Decoding (client side)
// ---------------------------------------------------------------------------

/// Parses a decrypted history body into readings.
///
/// `NO_DATA` and `ERROR:` bodies both yield an empty list without an
/// error — the caller inspects the body string only to decide what to
/// log, never for control flow. Blank segments are skipped, and a
/// record that fails to parse is dropped alone; the rest of the batch
/// survives.
pub fn decode_body(body: &str) -> Vec<Reading> {
    if body == NO_DATA || body.starts_with(ERROR_PREFIX) {
        return Vec::new();
    }

    let mut readings = Vec::new();
    for segment in body.split(RECORD_DELIMITER) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        match record::parse_historical(segment) {
            Ok(reading) => readings.push(reading),
            Err(e) => {
                tracing::warn!(%e, segment, "dropping malformed history record");
            }
        }
    }
    readings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
