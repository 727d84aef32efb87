//! Symmetric cipher codec for Triaxis wire tokens.
//!
//! Every protocol message travels as one base64 token per line. The
//! token is the AES-128-ECB encryption (PKCS#7 padding) of the UTF-8
//! plaintext, under a 16-byte key derived by SHA-1 digest-and-truncate
//! from a pre-shared secret. Both endpoints must be constructed with
//! the identical secret; no key exchange occurs.
//!
//! # Security properties
//!
//! This construction is an obfuscation layer, not real confidentiality:
//! ECB carries no nonce or IV, so identical plaintext blocks always
//! yield identical ciphertext blocks, and nothing authenticates the
//! payload, so tampering is undetectable. The mode is kept because the
//! on-wire token format is fixed by the protocol; interoperating peers
//! depend on it byte-for-byte.

use aes::Aes128;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ecb::cipher::block_padding::Pkcs7;
use ecb::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};
use sha1::{Digest, Sha1};

use triaxis_types::{Result, TriaxisError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fixed symmetric key length in bytes (AES-128).
pub const KEY_LEN: usize = 16;

/// AES block length in bytes. Valid ciphertext is always a non-zero
/// multiple of this.
pub const BLOCK_LEN: usize = 16;

type Aes128EcbEnc = ecb::Encryptor<Aes128>;
type Aes128EcbDec = ecb::Decryptor<Aes128>;

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

/// Derives the 16-byte wire key from a pre-shared secret.
///
/// SHA-1 digest of the secret bytes, truncated to the first 16 bytes.
/// Deterministic: both endpoints derive the same key from the same
/// secret.
pub fn derive_key(secret: &[u8]) -> [u8; KEY_LEN] {
    let digest = Sha1::digest(secret);
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&digest[..KEY_LEN]);
    key
}

// ---------------------------------------------------------------------------
// CipherCodec
// ---------------------------------------------------------------------------

/// Stateless encrypt/decrypt of wire tokens under one derived key.
///
/// The secret is injected at construction and the derived key cached
/// for the codec's lifetime; the key is constant for the process, so
/// re-deriving per call would buy nothing.
pub struct CipherCodec {
    key: [u8; KEY_LEN],
}

impl CipherCodec {
    /// Creates a codec from the pre-shared secret.
    pub fn new(secret: &str) -> Self {
        Self {
            key: derive_key(secret.as_bytes()),
        }
    }

    /// Encrypts `plaintext` into a one-line wire token.
    ///
    /// UTF-8 bytes → AES-128-ECB with PKCS#7 padding → base64. Identical
    /// plaintext always produces the identical token (no randomization).
    ///
    /// # Errors
    ///
    /// The pipeline has no failing step for valid UTF-8 input; the
    /// `Result` return keeps the caller contract uniform with
    /// [`decrypt`](Self::decrypt).
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = Aes128EcbEnc::new(&self.key.into());
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        Ok(BASE64.encode(ciphertext))
    }

    /// Decrypts a wire token back to its plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`TriaxisError::Cipher`] if the token is not valid
    /// base64, the ciphertext length is not a multiple of the block
    /// size, the PKCS#7 padding is invalid, or the plaintext is not
    /// UTF-8. Never panics on hostile input.
    pub fn decrypt(&self, token: &str) -> Result<String> {
        let ciphertext = BASE64
            .decode(token.trim())
            .map_err(|e| TriaxisError::Cipher {
                reason: format!("invalid base64 token: {e}"),
            })?;

        let cipher = Aes128EcbDec::new(&self.key.into());
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| TriaxisError::Cipher {
                reason: format!(
                    "ciphertext length ({}) or padding invalid",
                    ciphertext.len()
                ),
            })?;

        String::from_utf8(plaintext).map_err(|e| TriaxisError::Cipher {
            reason: format!("decrypted payload is not UTF-8: {e}"),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use triaxis_types::config::DEFAULT_SHARED_SECRET;

    fn codec() -> CipherCodec {
        CipherCodec::new(DEFAULT_SHARED_SECRET)
    }

    #[test]
    fn derive_key_is_deterministic() {
        let k1 = derive_key(b"secret");
        let k2 = derive_key(b"secret");
        assert_eq!(k1, k2);
        assert_ne!(k1, derive_key(b"other secret"));
    }

    #[test]
    fn encrypt_decrypt_roundtrip() -> Result<()> {
        let c = codec();
        let plaintext = "DATA:x:101, y:77, z:-3";
        let token = c.encrypt(plaintext)?;
        assert_ne!(token, plaintext);
        assert_eq!(c.decrypt(&token)?, plaintext);
        Ok(())
    }

    #[test]
    fn empty_plaintext_roundtrip() -> Result<()> {
        let c = codec();
        let token = c.encrypt("")?;
        // PKCS#7 pads the empty string to one full block.
        assert!(!token.is_empty());
        assert_eq!(c.decrypt(&token)?, "");
        Ok(())
    }

    #[test]
    fn identical_plaintext_yields_identical_token() -> Result<()> {
        // ECB determinism is an observable protocol property, not an
        // accident: there is no IV to randomize the output.
        let c = codec();
        let t1 = c.encrypt("HISTORICAL_REQUEST:ALL")?;
        let t2 = c.encrypt("HISTORICAL_REQUEST:ALL")?;
        assert_eq!(t1, t2);
        Ok(())
    }

    #[test]
    fn reencrypting_a_decrypted_token_reproduces_it() -> Result<()> {
        let c = codec();
        let token = c.encrypt("DATA:x:9, y:8, z:7")?;
        assert_eq!(c.encrypt(&c.decrypt(&token)?)?, token);
        Ok(())
    }

    #[test]
    fn two_codecs_same_secret_interoperate() -> Result<()> {
        let sender = CipherCodec::new("shared");
        let receiver = CipherCodec::new("shared");
        let token = sender.encrypt("x:1, y:2, z:3")?;
        assert_eq!(receiver.decrypt(&token)?, "x:1, y:2, z:3");
        Ok(())
    }

    #[test]
    fn wrong_secret_never_recovers_plaintext() -> Result<()> {
        let c = codec();
        let token = c.encrypt("DATA:x:1, y:2, z:3")?;
        let wrong = CipherCodec::new("not the shared secret");
        // Decryption may fail outright (padding/UTF-8) or produce
        // garbage; it must never reproduce the plaintext.
        assert_ne!(wrong.decrypt(&token).ok().as_deref(), Some("DATA:x:1, y:2, z:3"));
        Ok(())
    }

    #[test]
    fn bad_base64_fails_cleanly() {
        let result = codec().decrypt("not-base64!!");
        assert!(matches!(result, Err(TriaxisError::Cipher { .. })));
    }

    #[test]
    fn truncated_ciphertext_fails_cleanly() -> Result<()> {
        let c = codec();
        let token = c.encrypt("DATA:x:1, y:2, z:3")?;
        // Drop bytes so the decoded length is no longer a block multiple.
        let truncated = BASE64.encode(&BASE64.decode(&token).unwrap()[..7]);
        assert!(matches!(
            c.decrypt(&truncated),
            Err(TriaxisError::Cipher { .. })
        ));
        Ok(())
    }

    #[test]
    fn empty_token_fails_cleanly() {
        // base64-decodes to zero bytes, which is not a valid ciphertext.
        assert!(codec().decrypt("").is_err());
    }

    #[test]
    fn unicode_plaintext_roundtrip() -> Result<()> {
        let c = codec();
        let plaintext = "x:1, y:2, z:3, fecha:2024-01-01, hora:10:00:00 — señal";
        let token = c.encrypt(plaintext)?;
        assert_eq!(c.decrypt(&token)?, plaintext);
        Ok(())
    }
}
