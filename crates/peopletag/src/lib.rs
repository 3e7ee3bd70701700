//! # PeopleTag
//!
//! The profile core of PeopleTag: wallet-signature identity proof,
//! signature-derived decryption of private profiles, public/private merge
//! with graceful degradation, and tag search ranking.
//!
//! ## Overview
//!
//! A profile has two halves. The public half lives in a metadata store and
//! is readable by anyone. The private half is an encrypted envelope in
//! content-addressed storage, located through a ledger pointer, and only
//! its owner can open it: the key is derived from the owner's signature and
//! never stored.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use peopletag::{Identity, ProfileDirectory};
//! use peopletag::store::MemoryStore;
//!
//! async fn example(address: &str, message: &str, signature: &str) {
//!     let directory = ProfileDirectory::from_store(Arc::new(MemoryStore::new()));
//!
//!     // Anyone: public view only
//!     let public = directory
//!         .resolve_with_identity(address, false, &Identity::anonymous())
//!         .await
//!         .unwrap();
//!
//!     // The owner: public view plus decrypted private view
//!     let identity = Identity::new(address, Some(message), Some(signature));
//!     let full = directory
//!         .resolve_with_identity(address, true, &identity)
//!         .await
//!         .unwrap();
//!
//!     // Tag search
//!     let results = directory.search_tags("DeFi,Berlin", Some(20), None).await.unwrap();
//!     println!("{} of {}", results.items.len(), results.total);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `peopletag::core` - Addresses, profile documents, search ranking
//! - `peopletag::crypto` - Signature recovery, key derivation, envelopes
//! - `peopletag::store` - Collaborator traits and adapters

pub mod config;
pub mod directory;
pub mod error;

// Re-export component crates
pub use peopletag_core as core;
pub use peopletag_crypto as crypto;
pub use peopletag_store as store;

pub use config::{DirectoryConfig, SearchConfig};
pub use directory::ProfileDirectory;
pub use error::{DirectoryError, ErrorKind, Result};

// Re-export commonly used types
pub use peopletag_core::{
    ContentId, MergedProfileResponse, PrivateProfile, PublicProfile, PublicProfileMetadata,
    SearchQuery, SearchResultItem, SearchResults, WalletAddress,
};
pub use peopletag_crypto::{Caller, Identity};
