//! # PeopleTag Testkit
//!
//! Testing utilities for PeopleTag.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: signature recovery, key derivation and envelopes
//!   produced by an independent implementation
//! - **Generators**: Proptest strategies for profiles, tags and payloads
//! - **Fixtures**: Signing wallets and pre-populated stores
//!
//! ## Golden Vectors
//!
//! ```rust
//! use peopletag_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok) in verify_all_vectors() {
//!     assert!(ok, "{}", name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use peopletag_testkit::generators::{profile_from_params, ProfileParams};
//!
//! proptest! {
//!     #[test]
//!     fn display_name_falls_back(params: ProfileParams) {
//!         let meta = profile_from_params(&params);
//!         prop_assert!(meta.resolved_display_name().is_some() || params.display_name.is_none());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use peopletag_testkit::fixtures::{TestWallet, SIGN_IN_MESSAGE};
//!
//! let wallet = TestWallet::random();
//! let identity = wallet.identity(SIGN_IN_MESSAGE);
//! assert!(identity.authenticate().is_ok());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    multi_wallet_fixtures, publish_profile, sample_owner_public, sample_payload, sample_public,
    synthetic_profiles, TestWallet, SAMPLE_CIDS, SIGN_IN_MESSAGE,
};
pub use generators::{profile_from_params, ProfileParams};
pub use vectors::{envelope_vectors, kdf_vectors, verify_all_vectors, WALLET};
