//! # PeopleTag Crypto
//!
//! Identity proof and confidentiality for private profiles.
//!
//! ## Overview
//!
//! A profile owner never sends a password. Instead they sign an arbitrary
//! message with their wallet, and the signature does two jobs:
//!
//! 1. **Proof**: recovering the signer from the signature shows the caller
//!    controls the claimed address ([`verify_signature`]).
//! 2. **Key**: the signature bytes are the input key material for HKDF-SHA256,
//!    yielding the 32-byte key that decrypts the private profile
//!    ([`derive_key`]).
//!
//! The private profile lives off-platform as an [`EncryptedEnvelope`]
//! (hex ciphertext + hex nonce, AES-256-GCM by default).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use peopletag_crypto::{decrypt_profile, EncryptedEnvelope, Identity, Caller};
//!
//! # fn example(address: &str, message: &str, signature: &str, blob: &[u8]) {
//! let identity = Identity::new(address, Some(message), Some(signature));
//!
//! if let Ok(Caller::Verified(caller)) = identity.authenticate() {
//!     if let Some(key) = caller.key() {
//!         let envelope = EncryptedEnvelope::from_json(blob).unwrap();
//!         let payload = decrypt_profile(&envelope, key.as_bytes()).unwrap();
//!         println!("{:?}", payload.bio);
//!     }
//! }
//! # }
//! ```

pub mod envelope;
pub mod error;
pub mod identity;
pub mod kdf;
pub mod signature;

pub use envelope::{decrypt_profile, generate_nonce, EncryptedEnvelope, EncryptionFormat, NONCE_LEN};
pub use error::{CryptoError, Result};
pub use identity::{Caller, Identity, VerifiedCaller};
pub use kdf::{derive_key, derive_key_from_bytes, DerivedKey, KEY_INFO, KEY_LEN, KEY_SALT};
pub use signature::{
    address_of, keccak256, personal_message_hash, recover_address, verify_signature,
    WalletSignature, PERSONAL_MESSAGE_PREFIX, SIGNATURE_LEN,
};
