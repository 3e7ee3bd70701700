//! Error types for the crypto module.

use thiserror::Error;

/// Errors that can occur while proving identity or opening private profiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Input bytes could not be parsed (bad hex, wrong length, empty).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Symmetric key is not 32 bytes.
    #[error("invalid key length: expected 32 bytes, got {0}")]
    InvalidKey(usize),

    /// Envelope is missing its ciphertext or nonce, or they do not decode.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Signature does not belong to the claimed address, the AEAD tag
    /// check failed, or the plaintext is not a profile document.
    #[error("authentication failure: {0}")]
    AuthenticationFailure(String),

    /// Encryption failed (only reachable when sealing envelopes).
    #[error("encryption error: {0}")]
    EncryptionError(String),
}

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
