//! Error types for PeopleTag Core.

use thiserror::Error;

/// Errors raised while validating profile data and search requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid wallet address format: {0}")]
    InvalidAddress(String),

    #[error("invalid content id: {0}")]
    InvalidContentId(String),

    #[error("invalid search query: {0}")]
    InvalidQuery(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
