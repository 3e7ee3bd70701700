//! Database schema migrations for SQLite.
//!
//! Simple versioned migrations: each one moves the schema from version N
//! to N+1 inside the same transaction that records it.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema. Idempotent.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get::<_, Option<u32>>(0)
        })
        .optional()?
        .flatten()
        .unwrap_or(0);

    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema v{} is newer than supported v{}",
            current, CURRENT_VERSION
        )));
    }

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, Utc::now().timestamp_millis()],
            )?;
        }

        tx.commit()?;
        tracing::debug!(version = CURRENT_VERSION, "schema migrated");
    }

    Ok(())
}

fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Public profile records
        CREATE TABLE profiles (
            address TEXT PRIMARY KEY,          -- lowercased 0x address
            wallet_address TEXT NOT NULL,      -- address as submitted
            display_name TEXT,
            username TEXT,
            city TEXT,
            tags TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
            social_links TEXT NOT NULL DEFAULT '[]',  -- JSON array
            last_updated INTEGER               -- Unix ms, nullable
        );

        -- Ledger: address -> private profile blob
        CREATE TABLE content_pointers (
            address TEXT PRIMARY KEY,
            content_id TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );

        -- Content-addressed envelope documents
        CREATE TABLE content_blobs (
            content_id TEXT PRIMARY KEY,
            body BLOB NOT NULL,
            stored_at INTEGER NOT NULL
        );

        CREATE INDEX idx_profiles_city ON profiles(city COLLATE NOCASE);
        "#,
    )?;

    Ok(())
}
