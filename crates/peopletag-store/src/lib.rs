//! # PeopleTag Store
//!
//! The three collaborators the profile core reads from, and two adapters
//! that implement all of them.
//!
//! ## Overview
//!
//! Profile data is spread over three places:
//!
//! - [`MetadataStore`] - public profile records, keyed by lowercased address
//! - [`Ledger`] - the on-chain pointer from an address to its private profile
//! - [`ContentStore`] - content-addressed blobs holding encrypted envelopes
//!
//! [`SqliteStore`] keeps all three in one SQLite file. [`MemoryStore`] keeps
//! them in maps and is what tests and small composition roots use.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use peopletag_core::{PublicProfileMetadata, WalletAddress};
//! use peopletag_store::{MetadataStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("profiles.db").unwrap();
//!
//!     let meta = PublicProfileMetadata::new("0x52908400098527886E0F7030069857D2E4169EE7")
//!         .with_tags(["#DeFi"]);
//!     store.put_profile(&meta).await.unwrap();
//!
//!     let address = WalletAddress::parse("0x52908400098527886e0f7030069857d2e4169ee7").unwrap();
//!     let found = store.get_by_address(&address).await.unwrap();
//!     assert!(found.is_some());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Normalized keys**: every lookup is by [`WalletAddress`](peopletag_core::WalletAddress),
//!   so mixed-case input finds the same record
//! - **Stable listing**: `get_all` returns records in first-insertion order
//! - **Validated pointers**: writers reject content ids that are not CID-shaped

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ContentStore, Ledger, MetadataStore};
