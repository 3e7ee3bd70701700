//! Collaborator contracts consumed by the profile core.
//!
//! All methods are async: each one is a suspension point on real I/O
//! (database, chain RPC, content gateway). Implementations backed by a
//! blocking driver use `spawn_blocking` internally.

use async_trait::async_trait;
use peopletag_core::{ContentId, PublicProfileMetadata, WalletAddress};
use peopletag_crypto::EncryptedEnvelope;

use crate::error::Result;

/// Source of public profile records.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Get the record for an address, or `None` if there is none.
    async fn get_by_address(&self, address: &WalletAddress) -> Result<Option<PublicProfileMetadata>>;

    /// Get every record. Order is stable between calls.
    async fn get_all(&self) -> Result<Vec<PublicProfileMetadata>>;
}

/// The on-chain registry mapping an address to its private profile blob.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Get the content pointer for an address, or `None` if unset.
    async fn get_content_id(&self, address: &WalletAddress) -> Result<Option<ContentId>>;
}

/// Content-addressed blob storage.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch and parse the envelope stored under `id`.
    ///
    /// A missing blob is [`StoreError::NotFound`](crate::StoreError::NotFound).
    async fn fetch(&self, id: &ContentId) -> Result<EncryptedEnvelope>;
}
