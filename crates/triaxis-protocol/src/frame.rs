//! Frame construction: plaintext body + cipher codec → wire token.
//!
//! The only place where the wire codec meets the cipher codec. Every
//! function produces or consumes one token, i.e. one line on the wire
//! (the caller adds the trailing `\n`).

use triaxis_crypto::CipherCodec;
use triaxis_types::{Reading, Result};

use crate::command::{DATA_PREFIX, HISTORICAL_REQUEST_ALL};
use crate::{history, record};

/// Encodes a live reading into a `DATA:` wire token.
pub fn encode_data(codec: &CipherCodec, reading: &Reading) -> Result<String> {
    codec.encrypt(&format!("{DATA_PREFIX}{}", record::render_live(reading)))
}

/// Encodes the history request token.
pub fn encode_history_request(codec: &CipherCodec) -> Result<String> {
    codec.encrypt(HISTORICAL_REQUEST_ALL)
}

/// Encodes the history response token from backend records
/// (most-recent-first).
pub fn encode_history_response(codec: &CipherCodec, records: &[Reading]) -> Result<String> {
    codec.encrypt(&history::encode_body(records))
}

/// Encodes an `ERROR:` response token for a failed backend read.
pub fn encode_error_response(codec: &CipherCodec, reason: &str) -> Result<String> {
    codec.encrypt(&history::encode_error_body(reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use triaxis_types::config::DEFAULT_SHARED_SECRET;

    #[test]
    fn data_frame_decrypts_to_data_line() -> Result<()> {
        let codec = CipherCodec::new(DEFAULT_SHARED_SECRET);
        let token = encode_data(&codec, &Reading::live(1, 2, 3))?;
        assert_eq!(codec.decrypt(&token)?, "DATA:x:1, y:2, z:3");
        Ok(())
    }

    #[test]
    fn history_request_decrypts_to_literal() -> Result<()> {
        let codec = CipherCodec::new(DEFAULT_SHARED_SECRET);
        let token = encode_history_request(&codec)?;
        assert_eq!(codec.decrypt(&token)?, HISTORICAL_REQUEST_ALL);
        Ok(())
    }
}
