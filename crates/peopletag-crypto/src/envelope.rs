//! Encrypted private profile envelopes.
//!
//! An envelope is the JSON document stored in content-addressed storage:
//!
//! ```json
//! { "ciphertext": "<hex>", "nonce": "<hex, 12 bytes>" }
//! ```
//!
//! The ciphertext carries the 16-byte authentication tag at its end. When no
//! `format` is given the cipher is AES-256-GCM.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;
use peopletag_core::PrivateProfilePayload;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{CryptoError, Result};
use crate::kdf::{DerivedKey, KEY_LEN};

/// AEAD nonce length (96 bits) for both supported ciphers.
pub const NONCE_LEN: usize = 12;

/// Cipher used for an envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionFormat {
    /// AES-256-GCM, as produced by the browser client.
    #[default]
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,

    /// ChaCha20-Poly1305 with a 256-bit key.
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

impl EncryptionFormat {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// An encrypted private profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    /// Hex-encoded ciphertext including the tag. Empty means missing.
    #[serde(default)]
    pub ciphertext: String,

    /// Hex-encoded nonce. Empty means missing.
    #[serde(default)]
    pub nonce: String,

    #[serde(default, skip_serializing_if = "EncryptionFormat::is_default")]
    pub format: EncryptionFormat,
}

impl EncryptedEnvelope {
    /// Wrap raw ciphertext and nonce bytes.
    pub fn new(ciphertext: &[u8], nonce: &[u8; NONCE_LEN], format: EncryptionFormat) -> Self {
        Self {
            ciphertext: hex::encode(ciphertext),
            nonce: hex::encode(nonce),
            format,
        }
    }

    /// Parse the stored JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CryptoError::MalformedEnvelope(e.to_string()))
    }

    /// Serialize to the stored JSON document.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CryptoError::EncryptionError(e.to_string()))
    }

    /// Encrypt a payload under `key` with a fresh random nonce (AES-256-GCM).
    pub fn seal(payload: &PrivateProfilePayload, key: &DerivedKey) -> Result<Self> {
        Self::seal_with(payload, key.as_bytes(), generate_nonce(), EncryptionFormat::Aes256Gcm)
    }

    /// Encrypt a payload with an explicit nonce and cipher.
    ///
    /// Reusing a nonce under the same key breaks both ciphers; callers that
    /// pick nonces themselves own that invariant.
    pub fn seal_with(
        payload: &PrivateProfilePayload,
        key: &[u8],
        nonce: [u8; NONCE_LEN],
        format: EncryptionFormat,
    ) -> Result<Self> {
        if key.len() != KEY_LEN {
            return Err(CryptoError::InvalidKey(key.len()));
        }

        let mut plaintext =
            serde_json::to_vec(payload).map_err(|e| CryptoError::EncryptionError(e.to_string()))?;
        let sealed = match format {
            EncryptionFormat::Aes256Gcm => Aes256Gcm::new_from_slice(key)
                .map_err(|_| CryptoError::InvalidKey(key.len()))?
                .encrypt(&nonce.into(), plaintext.as_slice()),
            EncryptionFormat::ChaCha20Poly1305 => ChaCha20Poly1305::new_from_slice(key)
                .map_err(|_| CryptoError::InvalidKey(key.len()))?
                .encrypt(&nonce.into(), plaintext.as_slice()),
        };
        plaintext.zeroize();

        let ciphertext = sealed.map_err(|e| CryptoError::EncryptionError(e.to_string()))?;
        Ok(Self::new(&ciphertext, &nonce, format))
    }

    /// Decrypt and parse the private profile.
    ///
    /// All-or-nothing: either the full payload comes back or an error does.
    pub fn open(&self, key: &[u8]) -> Result<PrivateProfilePayload> {
        if key.len() != KEY_LEN {
            return Err(CryptoError::InvalidKey(key.len()));
        }
        let (ciphertext, nonce) = self.decode()?;

        let opened = match self.format {
            EncryptionFormat::Aes256Gcm => Aes256Gcm::new_from_slice(key)
                .map_err(|_| CryptoError::InvalidKey(key.len()))?
                .decrypt(&nonce.into(), ciphertext.as_slice()),
            EncryptionFormat::ChaCha20Poly1305 => ChaCha20Poly1305::new_from_slice(key)
                .map_err(|_| CryptoError::InvalidKey(key.len()))?
                .decrypt(&nonce.into(), ciphertext.as_slice()),
        };
        let mut plaintext = opened
            .map_err(|_| CryptoError::AuthenticationFailure("authentication tag mismatch".into()))?;

        let parsed = serde_json::from_slice::<PrivateProfilePayload>(&plaintext).map_err(|e| {
            CryptoError::AuthenticationFailure(format!("plaintext is not a profile document: {}", e))
        });
        plaintext.zeroize();
        parsed
    }

    fn decode(&self) -> Result<(Vec<u8>, [u8; NONCE_LEN])> {
        if self.ciphertext.is_empty() {
            return Err(CryptoError::MalformedEnvelope("missing ciphertext".into()));
        }
        if self.nonce.is_empty() {
            return Err(CryptoError::MalformedEnvelope("missing nonce".into()));
        }

        let ciphertext = hex::decode(&self.ciphertext)
            .map_err(|e| CryptoError::MalformedEnvelope(format!("ciphertext: {}", e)))?;
        let nonce = hex::decode(&self.nonce)
            .map_err(|e| CryptoError::MalformedEnvelope(format!("nonce: {}", e)))?;
        let nonce: [u8; NONCE_LEN] = nonce.as_slice().try_into().map_err(|_| {
            CryptoError::MalformedEnvelope(format!(
                "nonce must be {} bytes, got {}",
                NONCE_LEN,
                nonce.len()
            ))
        })?;

        Ok((ciphertext, nonce))
    }
}

/// Decrypt a private profile envelope with a 32-byte key.
pub fn decrypt_profile(envelope: &EncryptedEnvelope, key: &[u8]) -> Result<PrivateProfilePayload> {
    envelope.open(key)
}

/// Generate a random 96-bit nonce.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}
