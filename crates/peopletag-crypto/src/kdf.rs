//! Signature-derived symmetric keys.
//!
//! The key that encrypts a private profile is never stored anywhere. It is
//! recomputed from the owner's signature on every request:
//!
//! ```text
//! key = HKDF-SHA256(ikm = signature bytes,
//!                   salt = "PeopleTag-encryption-v1",
//!                   info = "PeopletagEncryptionKey",
//!                   L = 32)
//! ```
//!
//! Salt and info are shared with the client that encrypted the profile. If
//! either changes by one bit every existing envelope becomes unreadable.

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, Result};
use crate::signature::decode_hex_bytes;

/// HKDF salt.
pub const KEY_SALT: &[u8] = b"PeopleTag-encryption-v1";

/// HKDF info / context string.
pub const KEY_INFO: &[u8] = b"PeopletagEncryptionKey";

/// Derived key length in bytes.
pub const KEY_LEN: usize = 32;

/// A 256-bit key derived from a wallet signature.
///
/// Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derive the profile key from a hex-encoded signature.
///
/// Any non-empty byte string is accepted; the signature is not required to
/// be 65 bytes here, only to decode.
pub fn derive_key(signature: &str) -> Result<DerivedKey> {
    let mut ikm = decode_hex_bytes(signature)?;
    let key = derive_key_from_bytes(&ikm);
    ikm.zeroize();
    key
}

/// Derive the profile key from raw signature bytes.
pub fn derive_key_from_bytes(signature: &[u8]) -> Result<DerivedKey> {
    if signature.is_empty() {
        return Err(CryptoError::InvalidInput("signature is required".into()));
    }

    let hkdf = Hkdf::<Sha256>::new(Some(KEY_SALT), signature);
    let mut okm = [0u8; KEY_LEN];
    hkdf.expand(KEY_INFO, &mut okm)
        .map_err(|e| CryptoError::InvalidInput(format!("HKDF expansion failed: {}", e)))?;

    Ok(DerivedKey(okm))
}
