//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: signing wallets, sealed private
//! profiles, and a populated in-memory store.

use chrono::{DateTime, TimeZone, Utc};
use k256::ecdsa::SigningKey;
use serde_json::json;

use peopletag_core::{ContentId, PrivateProfilePayload, PublicProfileMetadata, WalletAddress};
use peopletag_crypto::{
    address_of, derive_key_from_bytes, personal_message_hash, Caller, DerivedKey,
    EncryptedEnvelope, Identity, WalletSignature,
};
use peopletag_store::{MemoryStore, Result as StoreResult};

/// Message the fixtures sign by default.
pub const SIGN_IN_MESSAGE: &str = "Sign in to PeopleTag";

/// Well-formed CIDs for fixtures, one per wallet index.
pub const SAMPLE_CIDS: [&str; 3] = [
    "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG",
    "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi",
    "bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku",
];

/// A wallet that can sign personal messages.
pub struct TestWallet {
    signing_key: SigningKey,
    address: WalletAddress,
}

impl TestWallet {
    /// Create a wallet with a random key.
    pub fn random() -> Self {
        Self::from_key(SigningKey::random(&mut rand::thread_rng()))
    }

    /// Create with a deterministic key.
    ///
    /// # Panics
    /// If `seed` is zero or not below the curve order.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let key = SigningKey::from_slice(&seed).expect("seed is a valid secp256k1 scalar");
        Self::from_key(key)
    }

    fn from_key(signing_key: SigningKey) -> Self {
        let address = address_of(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    pub fn address(&self) -> WalletAddress {
        self.address
    }

    /// Lowercase `0x` hex address.
    pub fn address_hex(&self) -> String {
        self.address.to_hex()
    }

    /// Sign `message` as a personal message.
    pub fn sign_message(&self, message: &str) -> WalletSignature {
        let prehash = personal_message_hash(message.as_bytes());
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(&prehash)
            .expect("signing a 32-byte prehash cannot fail");
        WalletSignature::from_parts(&signature, recovery_id)
    }

    /// A complete identity proof for `message`.
    pub fn identity(&self, message: &str) -> Identity {
        let signature = self.sign_message(message).to_hex();
        Identity::new(&self.address_hex(), Some(message), Some(&signature))
    }

    /// The authenticated caller for `message`.
    pub fn caller(&self, message: &str) -> Caller {
        self.identity(message)
            .authenticate()
            .expect("own signature verifies")
    }

    /// The key this wallet's signature over `message` derives.
    pub fn profile_key(&self, message: &str) -> DerivedKey {
        derive_key_from_bytes(self.sign_message(message).as_bytes())
            .expect("65-byte signature is valid key material")
    }

    /// Encrypt `payload` under the key for `message`.
    pub fn seal(&self, message: &str, payload: &PrivateProfilePayload) -> EncryptedEnvelope {
        EncryptedEnvelope::seal(payload, &self.profile_key(message)).expect("sealing cannot fail")
    }
}

/// Create several deterministic wallets.
pub fn multi_wallet_fixtures(count: usize) -> Vec<TestWallet> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = 0x5a;
            seed[24..].copy_from_slice(&(i as u64 + 1).to_be_bytes());
            TestWallet::from_seed(seed)
        })
        .collect()
}

/// Fixed timestamp `base + offset_secs`, base = 2024-05-01T12:00:00Z.
pub fn at(offset_secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_714_564_800 + offset_secs, 0)
        .single()
        .unwrap_or_default()
}

/// A public record with the given tags.
pub fn sample_public(address: &str, tags: &[&str]) -> PublicProfileMetadata {
    PublicProfileMetadata::new(address).with_tags(tags.iter().copied())
}

/// The private document used across tests.
///
/// `#DeFi` and the x.com link overlap with [`sample_owner_public`], so the
/// merged view hides them.
pub fn sample_payload() -> PrivateProfilePayload {
    PrivateProfilePayload {
        bio: Some("gm".into()),
        birth_date: Some("1990-01-01".into()),
        tags: vec!["#DeFi".into(), "#Secret".into()],
        social_links: vec![json!("https://x.com/alice"), json!("https://lens.xyz/alice")],
    }
}

/// The owner's public record matching [`sample_payload`].
pub fn sample_owner_public(address: &str) -> PublicProfileMetadata {
    sample_public(address, &["#DeFi", "#Berlin"])
        .with_display_name("Alice")
        .with_city("Berlin")
        .with_social_links(vec![json!("https://x.com/alice")])
        .updated_at(at(0))
}

/// Publish an owner's full profile into `store`: public record, ledger
/// pointer, and the sealed private document.
pub fn publish_profile(
    store: &MemoryStore,
    wallet: &TestWallet,
    public: PublicProfileMetadata,
    payload: &PrivateProfilePayload,
    cid: &str,
) -> StoreResult<ContentId> {
    store.put_profile(public)?;
    let id = store.set_content_id(&wallet.address(), cid)?;
    store.put_envelope(&id, &wallet.seal(SIGN_IN_MESSAGE, payload))?;
    Ok(id)
}

/// `count` public records cycling through a small tag and city vocabulary,
/// with distinct timestamps. Used by benchmarks and ranking tests.
pub fn synthetic_profiles(count: usize) -> Vec<PublicProfileMetadata> {
    const TAGS: [&str; 8] = [
        "#DeFi", "#Berlin", "#Art", "#NFT", "#DAO", "#Rust", "#Music", "#Climate",
    ];
    const CITIES: [&str; 4] = ["Berlin", "Paris", "Lisbon", "Tokyo"];

    (0..count)
        .map(|i| {
            let address = format!("0x{:040x}", i + 1);
            let tags: Vec<&str> = (0..=(i % 3)).map(|j| TAGS[(i + j * 3) % TAGS.len()]).collect();
            let mut meta = sample_public(&address, &tags).with_city(CITIES[i % CITIES.len()]);
            if i % 5 != 0 {
                meta = meta.updated_at(at(i as i64));
            }
            meta
        })
        .collect()
}
