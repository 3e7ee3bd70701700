//! Wallet signature recovery for personal messages.
//!
//! Messages are signed with the personal-message scheme: the signer hashes
//! `"\x19Ethereum Signed Message:\n" || len(message) || message` with
//! Keccak-256 and produces a recoverable secp256k1 signature `r || s || v`.

use std::fmt;

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use peopletag_core::WalletAddress;
use sha3::{Digest, Keccak256};

use crate::error::{CryptoError, Result};

/// Prefix prepended to every personal message before hashing.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Length of a recoverable signature: 32-byte r, 32-byte s, 1-byte v.
pub const SIGNATURE_LEN: usize = 65;

/// A 65-byte recoverable signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WalletSignature(pub [u8; SIGNATURE_LEN]);

impl WalletSignature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = decode_hex_bytes(s)?;
        let arr: [u8; SIGNATURE_LEN] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidInput(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Lowercase `0x` hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Assemble from an ECDSA signature and its recovery id (`v` = 27 or 28).
    pub fn from_parts(signature: &Signature, recovery_id: RecoveryId) -> Self {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = 27 + recovery_id.to_byte();
        Self(bytes)
    }

    /// Split into a low-s signature and matching recovery id.
    ///
    /// `v` may be 27/28 or 0/1. A high-s signature is normalized and its
    /// recovery parity flipped, which recovers the same key.
    fn split(&self) -> Result<(Signature, RecoveryId)> {
        let v = match self.0[64] {
            v @ (27 | 28) => v - 27,
            v @ (0 | 1) => v,
            v => {
                return Err(CryptoError::InvalidInput(format!(
                    "unsupported recovery byte: {}",
                    v
                )))
            }
        };
        let recovery_id = RecoveryId::from_byte(v)
            .ok_or_else(|| CryptoError::InvalidInput(format!("invalid recovery id: {}", v)))?;
        let signature = Signature::from_slice(&self.0[..64])
            .map_err(|e| CryptoError::InvalidInput(e.to_string()))?;

        Ok(match signature.normalize_s() {
            Some(normalized) => (
                normalized,
                RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
            ),
            None => (signature, recovery_id),
        })
    }
}

impl fmt::Debug for WalletSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletSignature({}..)", &self.to_hex()[..18])
    }
}

/// Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let digest = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Hash a message the way wallets do for personal signing.
pub fn personal_message_hash(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);

    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Address of a secp256k1 public key: the last 20 bytes of the Keccak-256
/// of its uncompressed encoding (without the 0x04 tag).
pub fn address_of(key: &VerifyingKey) -> WalletAddress {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..]);
    WalletAddress::from_bytes(addr)
}

/// Recover the address that signed `message`.
pub fn recover_address(message: &str, signature: &WalletSignature) -> Result<WalletAddress> {
    let (sig, recovery_id) = signature.split()?;
    let prehash = personal_message_hash(message.as_bytes());
    let key = VerifyingKey::recover_from_prehash(&prehash, &sig, recovery_id)
        .map_err(|e| CryptoError::InvalidInput(e.to_string()))?;
    Ok(address_of(&key))
}

/// Check that `signature` over `message` was produced by `claimed_address`.
///
/// Comparison is case-insensitive. Any malformed input yields `false`.
pub fn verify_signature(claimed_address: &str, message: &str, signature: &str) -> bool {
    let recovered = WalletSignature::from_hex(signature)
        .and_then(|sig| recover_address(message, &sig));

    match recovered {
        Ok(addr) => addr.matches(claimed_address),
        Err(e) => {
            tracing::debug!("signature recovery failed: {}", e);
            false
        }
    }
}

/// Decode hex with an optional `0x` prefix. Empty input is rejected.
pub(crate) fn decode_hex_bytes(s: &str) -> Result<Vec<u8>> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() {
        return Err(CryptoError::InvalidInput("empty hex string".into()));
    }
    hex::decode(digits).map_err(|e| CryptoError::InvalidInput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    // Independently produced: key 0x4c08…2318 signing "Sign in to PeopleTag".
    const GOLDEN_ADDRESS: &str = "0x2c7536e3605d9c16a7a3d7b1898e529396a65c23";
    const GOLDEN_MESSAGE: &str = "Sign in to PeopleTag";
    const GOLDEN_HASH: &str = "b919095cb67ab5b116f4997f37bea915ae076d46d5ba18cff15cb310a219d8c8";
    const GOLDEN_SIGNATURE: &str = "0xbb50e2d89a4ed70663d080659fe0ad4b9bc3e06c17a227433966cb59ceee020d33cd4d743eb24acc5fcb24c368487cc6a9e384f0b16b87f1438398f2a08783291c";

    fn signing_key(byte: u8) -> SigningKey {
        let mut seed = [0u8; 32];
        seed[31] = byte;
        SigningKey::from_slice(&seed).unwrap()
    }

    fn sign(key: &SigningKey, message: &str) -> WalletSignature {
        let (sig, recid) = key
            .sign_prehash_recoverable(&personal_message_hash(message.as_bytes()))
            .unwrap();
        WalletSignature::from_parts(&sig, recid)
    }

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_personal_message_hash_golden() {
        assert_eq!(
            hex::encode(personal_message_hash(GOLDEN_MESSAGE.as_bytes())),
            GOLDEN_HASH
        );
    }

    #[test]
    fn test_address_of_key_one() {
        let key = signing_key(1);
        assert_eq!(
            address_of(key.verifying_key()).to_hex(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_recover_golden_signature() {
        let sig = WalletSignature::from_hex(GOLDEN_SIGNATURE).unwrap();
        let addr = recover_address(GOLDEN_MESSAGE, &sig).unwrap();
        assert_eq!(addr.to_hex(), GOLDEN_ADDRESS);
    }

    #[test]
    fn test_verify_golden_case_insensitive() {
        assert!(verify_signature(GOLDEN_ADDRESS, GOLDEN_MESSAGE, GOLDEN_SIGNATURE));
        assert!(verify_signature(
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23",
            GOLDEN_MESSAGE,
            GOLDEN_SIGNATURE
        ));
    }

    #[test]
    fn test_verify_round_trip() {
        let key = signing_key(7);
        let addr = address_of(key.verifying_key());
        let sig = sign(&key, "hello");

        assert!(verify_signature(&addr.to_hex(), "hello", &sig.to_hex()));
    }

    #[test]
    fn test_verify_rejects_other_address() {
        let alice = signing_key(7);
        let bob = signing_key(8);
        let sig = sign(&alice, "hello");

        let bob_addr = address_of(bob.verifying_key()).to_hex();
        assert!(!verify_signature(&bob_addr, "hello", &sig.to_hex()));
    }

    #[test]
    fn test_verify_rejects_other_message() {
        let key = signing_key(7);
        let addr = address_of(key.verifying_key()).to_hex();
        let sig = sign(&key, "hello");

        assert!(!verify_signature(&addr, "goodbye", &sig.to_hex()));
    }

    #[test]
    fn test_verify_accepts_zero_one_recovery_byte() {
        let mut bytes = *WalletSignature::from_hex(GOLDEN_SIGNATURE).unwrap().as_bytes();
        bytes[64] -= 27;
        let sig = WalletSignature::from_bytes(bytes);

        assert!(verify_signature(GOLDEN_ADDRESS, GOLDEN_MESSAGE, &sig.to_hex()));
    }

    #[test]
    fn test_verify_accepts_high_s() {
        use k256::elliptic_curve::PrimeField;
        use k256::{FieldBytes, Scalar};

        let mut bytes = *WalletSignature::from_hex(GOLDEN_SIGNATURE).unwrap().as_bytes();

        // s' = n - s with flipped parity describes the same signature.
        let s = Scalar::from_repr(FieldBytes::clone_from_slice(&bytes[32..64])).unwrap();
        bytes[32..64].copy_from_slice(&(-s).to_bytes());
        bytes[64] = if bytes[64] == 27 { 28 } else { 27 };
        let high_sig = WalletSignature::from_bytes(bytes);

        assert!(verify_signature(GOLDEN_ADDRESS, GOLDEN_MESSAGE, &high_sig.to_hex()));
    }

    #[test]
    fn test_malformed_inputs_are_false() {
        assert!(!verify_signature(GOLDEN_ADDRESS, GOLDEN_MESSAGE, ""));
        assert!(!verify_signature(GOLDEN_ADDRESS, GOLDEN_MESSAGE, "0x"));
        assert!(!verify_signature(GOLDEN_ADDRESS, GOLDEN_MESSAGE, "0xzz"));
        assert!(!verify_signature(GOLDEN_ADDRESS, GOLDEN_MESSAGE, "0x1234"));
        assert!(!verify_signature(
            GOLDEN_ADDRESS,
            GOLDEN_MESSAGE,
            &format!("0x{}", "00".repeat(65))
        ));
        assert!(!verify_signature("not-an-address", GOLDEN_MESSAGE, GOLDEN_SIGNATURE));
    }

    #[test]
    fn test_bad_recovery_byte_rejected() {
        let mut bytes = *WalletSignature::from_hex(GOLDEN_SIGNATURE).unwrap().as_bytes();
        bytes[64] = 35;
        let sig = WalletSignature::from_bytes(bytes);

        assert!(matches!(
            recover_address(GOLDEN_MESSAGE, &sig),
            Err(CryptoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_signature_hex_prefix_optional() {
        let with = WalletSignature::from_hex(GOLDEN_SIGNATURE).unwrap();
        let without = WalletSignature::from_hex(&GOLDEN_SIGNATURE[2..]).unwrap();
        assert_eq!(with, without);
    }
}
