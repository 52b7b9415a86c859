// ── Secret encryption at rest ──
//
// Site API keys and the team credential are stored encrypted. The codec
// is injected so hosts can plug in their own key management.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand_core::{OsRng, RngCore};
use thiserror::Error;
use zeroize::Zeroizing;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid encryption key: {0}")]
    InvalidKey(String),

    #[error("ciphertext is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("ciphertext too short ({len} bytes)")]
    Truncated { len: usize },

    #[error("AEAD encryption failed")]
    EncryptFailed,

    #[error("AEAD decryption failed (wrong key or tampered data)")]
    DecryptFailed,

    #[error("decrypted value is not UTF-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
}

/// Symmetric encrypt/decrypt of short text secrets.
///
/// Implementations must round-trip exactly, and must map the empty
/// string to itself in both directions so an absent attribute reads
/// as an empty secret.
pub trait SecretCodec: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String, CodecError>;
    fn decrypt(&self, ciphertext: &str) -> Result<String, CodecError>;
}

/// XChaCha20-Poly1305 codec. Output is base64 of `nonce || ciphertext`.
pub struct XChaChaCodec {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl XChaChaCodec {
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self {
            key: Zeroizing::new(key),
        }
    }

    /// Build from a base64-encoded 32-byte key.
    pub fn from_base64(encoded: &str) -> Result<Self, CodecError> {
        let raw = Zeroizing::new(
            STANDARD
                .decode(encoded.trim())
                .map_err(|e| CodecError::InvalidKey(e.to_string()))?,
        );
        let key: [u8; KEY_LEN] = raw.as_slice().try_into().map_err(|_| {
            CodecError::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", raw.len()))
        })?;
        Ok(Self::new(key))
    }

    /// Generate a fresh random key, base64-encoded.
    pub fn generate_key() -> String {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(key.as_mut());
        STANDARD.encode(&key[..])
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(&Key::from(*self.key))
    }
}

impl fmt::Debug for XChaChaCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XChaChaCodec").finish_non_exhaustive()
    }
}

impl SecretCodec for XChaChaCodec {
    fn encrypt(&self, plaintext: &str) -> Result<String, CodecError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ct = self
            .cipher()
            .encrypt(&XNonce::from(nonce_bytes), plaintext.as_bytes())
            .map_err(|_| CodecError::EncryptFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + ct.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ct);
        Ok(STANDARD.encode(out))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, CodecError> {
        let ciphertext = ciphertext.trim();
        if ciphertext.is_empty() {
            return Ok(String::new());
        }

        let raw = STANDARD.decode(ciphertext)?;
        if raw.len() <= NONCE_LEN {
            return Err(CodecError::Truncated { len: raw.len() });
        }
        let (nonce, ct) = raw.split_at(NONCE_LEN);

        let pt = self
            .cipher()
            .decrypt(XNonce::from_slice(nonce), ct)
            .map_err(|_| CodecError::DecryptFailed)?;
        Ok(String::from_utf8(pt)?)
    }
}
