//! SQLite implementation of the collaborator traits.
//!
//! Uses rusqlite with bundled SQLite, wrapped in async via
//! `tokio::task::spawn_blocking`. One file holds profiles, ledger pointers
//! and envelope blobs.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use peopletag_core::{ContentId, PublicProfileMetadata, WalletAddress};
use peopletag_crypto::EncryptedEnvelope;

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{ContentStore, Ledger, MetadataStore};

const PROFILE_COLUMNS: &str =
    "wallet_address, display_name, username, city, tags, social_links, last_updated";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Transport(format!("spawn_blocking failed: {}", e)))?
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writers
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or replace the public record for `meta.wallet_address`.
    pub async fn put_profile(&self, meta: &PublicProfileMetadata) -> Result<WalletAddress> {
        let address = WalletAddress::parse(&meta.wallet_address)?;
        let meta = meta.clone();
        let tags = serde_json::to_string(&meta.tags)?;
        let social_links = serde_json::to_string(&meta.social_links)?;

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO profiles (
                    address, wallet_address, display_name, username, city,
                    tags, social_links, last_updated
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(address) DO UPDATE SET
                    wallet_address = excluded.wallet_address,
                    display_name = excluded.display_name,
                    username = excluded.username,
                    city = excluded.city,
                    tags = excluded.tags,
                    social_links = excluded.social_links,
                    last_updated = excluded.last_updated",
                params![
                    address.to_hex(),
                    meta.wallet_address,
                    meta.display_name,
                    meta.username,
                    meta.city,
                    tags,
                    social_links,
                    meta.last_updated.map(|ts| ts.timestamp_millis()),
                ],
            )?;
            Ok(address)
        })
        .await
    }

    /// Point `address` at a private profile blob.
    pub async fn set_content_id(&self, address: &WalletAddress, id: &str) -> Result<ContentId> {
        let id = ContentId::parse(id)?;
        let address = *address;
        let stored = id.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO content_pointers (address, content_id, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(address) DO UPDATE SET
                    content_id = excluded.content_id,
                    updated_at = excluded.updated_at",
                params![address.to_hex(), stored.as_str(), Utc::now().timestamp_millis()],
            )?;
            Ok(())
        })
        .await?;

        Ok(id)
    }

    /// Store a raw blob. Content addressing makes rewrites no-ops.
    pub async fn put_content(&self, id: &ContentId, blob: impl Into<Bytes>) -> Result<()> {
        let id = id.clone();
        let blob: Bytes = blob.into();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO content_blobs (content_id, body, stored_at)
                 VALUES (?1, ?2, ?3)",
                params![id.as_str(), &blob[..], Utc::now().timestamp_millis()],
            )?;
            Ok(())
        })
        .await
    }

    /// Store an envelope as its JSON document.
    pub async fn put_envelope(&self, id: &ContentId, envelope: &EncryptedEnvelope) -> Result<()> {
        let doc = envelope
            .to_json()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.put_content(id, doc).await
    }
}

fn row_to_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<PublicProfileMetadata> {
    let tags: String = row.get("tags")?;
    let social_links: String = row.get("social_links")?;
    let last_updated: Option<i64> = row.get("last_updated")?;

    let mut meta = PublicProfileMetadata::new(row.get::<_, String>("wallet_address")?);
    meta.display_name = row.get("display_name")?;
    meta.username = row.get("username")?;
    meta.city = row.get("city")?;
    meta.tags = serde_json::from_str(&tags)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    meta.social_links = serde_json::from_str(&social_links)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    meta.last_updated = last_updated.and_then(|ms| Utc.timestamp_millis_opt(ms).single());

    Ok(meta)
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn get_by_address(&self, address: &WalletAddress) -> Result<Option<PublicProfileMetadata>> {
        let key = address.to_hex();

        self.with_conn(move |conn| {
            let meta = conn
                .query_row(
                    &format!("SELECT {} FROM profiles WHERE address = ?1", PROFILE_COLUMNS),
                    params![key],
                    row_to_profile,
                )
                .optional()?;
            Ok(meta)
        })
        .await
    }

    async fn get_all(&self) -> Result<Vec<PublicProfileMetadata>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM profiles ORDER BY rowid", PROFILE_COLUMNS))?;
            let profiles = stmt
                .query_map([], row_to_profile)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(profiles)
        })
        .await
    }
}

#[async_trait]
impl Ledger for SqliteStore {
    async fn get_content_id(&self, address: &WalletAddress) -> Result<Option<ContentId>> {
        let key = address.to_hex();

        self.with_conn(move |conn| {
            let id: Option<String> = conn
                .query_row(
                    "SELECT content_id FROM content_pointers WHERE address = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id.map(ContentId::new))
        })
        .await
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn fetch(&self, id: &ContentId) -> Result<EncryptedEnvelope> {
        let key = id.clone();

        let body: Vec<u8> = self
            .with_conn(move |conn| {
                conn.query_row(
                    "SELECT body FROM content_blobs WHERE content_id = ?1",
                    params![key.as_str()],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| StoreError::NotFound(key.to_string()))
            })
            .await?;

        EncryptedEnvelope::from_json(&body).map_err(|e| StoreError::InvalidData(e.to_string()))
    }
}
