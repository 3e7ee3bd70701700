//! # PeopleTag Core
//!
//! Pure primitives for PeopleTag profiles: wallet addresses, content pointers,
//! public and private profile documents, and tag search ranking.
//!
//! This crate contains no I/O and no cryptography. Everything here is plain
//! computation over data that a collaborator has already fetched.
//!
//! ## Key Types
//!
//! - [`WalletAddress`] - A 20-byte account address, rendered as lowercase `0x` hex
//! - [`ContentId`] - Pointer to an immutable blob in content-addressed storage
//! - [`PublicProfileMetadata`] - The public record owned by the metadata store
//! - [`PrivateProfilePayload`] - The decrypted private document
//! - [`MergedProfileResponse`] - Public view plus the optional private view
//! - [`SearchQuery`] / [`SearchResults`] - Tag search input and ranked output
//!
//! ## Search
//!
//! Ranking is a stable sort over an in-memory snapshot. See [`search`].

pub mod error;
pub mod profile;
pub mod search;
pub mod types;
pub mod validation;

pub use error::{CoreError, Result};
pub use profile::{
    MergedProfileResponse, PrivateProfile, PrivateProfilePayload, PublicProfile,
    PublicProfileMetadata,
};
pub use search::{
    search, SearchQuery, SearchResultItem, SearchResults, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT,
    TAG_MARKER,
};
pub use types::{format_timestamp, ContentId, WalletAddress};
pub use validation::{is_valid_address, is_valid_content_id};
