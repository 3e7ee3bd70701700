//! In-memory implementation of the collaborator traits.
//!
//! Same semantics as SQLite, nothing persisted. Used by tests and by
//! composition roots that load profile data at startup.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;

use peopletag_core::{ContentId, PublicProfileMetadata, WalletAddress};
use peopletag_crypto::EncryptedEnvelope;

use crate::error::{Result, StoreError};
use crate::traits::{ContentStore, Ledger, MetadataStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Profiles in first-insertion order.
    profiles: Vec<PublicProfileMetadata>,

    /// Address -> index into `profiles`.
    index: HashMap<WalletAddress, usize>,

    /// Ledger pointers.
    pointers: HashMap<WalletAddress, ContentId>,

    /// Raw envelope documents by content id.
    blobs: HashMap<ContentId, Bytes>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Transport(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Transport(format!("lock poisoned: {}", e)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writers
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or replace the public record for `meta.wallet_address`.
    ///
    /// A replaced record keeps its original listing position.
    pub fn put_profile(&self, meta: PublicProfileMetadata) -> Result<WalletAddress> {
        let address = WalletAddress::parse(&meta.wallet_address)?;
        let mut inner = self.write()?;

        match inner.index.get(&address).copied() {
            Some(i) => inner.profiles[i] = meta,
            None => {
                let i = inner.profiles.len();
                inner.profiles.push(meta);
                inner.index.insert(address, i);
            }
        }

        Ok(address)
    }

    /// Point `address` at a private profile blob.
    pub fn set_content_id(&self, address: &WalletAddress, id: &str) -> Result<ContentId> {
        let id = ContentId::parse(id)?;
        self.write()?.pointers.insert(*address, id.clone());
        Ok(id)
    }

    /// Store a raw blob. The bytes are not inspected until fetched.
    ///
    /// Content addressing makes rewrites no-ops: the first blob stored
    /// under an id is kept.
    pub fn put_content(&self, id: &ContentId, blob: impl Into<Bytes>) -> Result<()> {
        self.write()?
            .blobs
            .entry(id.clone())
            .or_insert_with(|| blob.into());
        Ok(())
    }

    /// Store an envelope as its JSON document.
    pub fn put_envelope(&self, id: &ContentId, envelope: &EncryptedEnvelope) -> Result<()> {
        let doc = envelope
            .to_json()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.put_content(id, doc)
    }

    /// Number of public records.
    pub fn profile_count(&self) -> Result<usize> {
        Ok(self.read()?.profiles.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn get_by_address(&self, address: &WalletAddress) -> Result<Option<PublicProfileMetadata>> {
        let inner = self.read()?;
        Ok(inner
            .index
            .get(address)
            .and_then(|&i| inner.profiles.get(i))
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<PublicProfileMetadata>> {
        Ok(self.read()?.profiles.clone())
    }
}

#[async_trait]
impl Ledger for MemoryStore {
    async fn get_content_id(&self, address: &WalletAddress) -> Result<Option<ContentId>> {
        Ok(self.read()?.pointers.get(address).cloned())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch(&self, id: &ContentId) -> Result<EncryptedEnvelope> {
        let blob = self
            .read()?
            .blobs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        EncryptedEnvelope::from_json(&blob).map_err(|e| StoreError::InvalidData(e.to_string()))
    }
}
