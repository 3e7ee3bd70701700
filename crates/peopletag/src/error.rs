//! Error types for profile resolution and search.

use peopletag_core::CoreError;
use peopletag_crypto::CryptoError;
use peopletag_store::StoreError;
use thiserror::Error;

/// Errors surfaced by [`ProfileDirectory`](crate::ProfileDirectory).
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Malformed address, content id or search query.
    #[error("invalid input: {0}")]
    Core(#[from] CoreError),

    /// Identity proof or envelope problem.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Collaborator failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// No public profile exists for the address.
    #[error("profile not found: {0}")]
    NotFound(String),

    /// Configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification a transport layer maps onto status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    AuthenticationFailure,
    TransportFailure,
}

impl DirectoryError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectoryError::Core(_) | DirectoryError::InvalidConfig(_) => ErrorKind::InvalidInput,
            DirectoryError::NotFound(_) => ErrorKind::NotFound,
            DirectoryError::Crypto(CryptoError::AuthenticationFailure(_)) => {
                ErrorKind::AuthenticationFailure
            }
            DirectoryError::Crypto(_) => ErrorKind::InvalidInput,
            DirectoryError::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            DirectoryError::Store(StoreError::Core(_)) => ErrorKind::InvalidInput,
            DirectoryError::Store(_) => ErrorKind::TransportFailure,
        }
    }
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;
