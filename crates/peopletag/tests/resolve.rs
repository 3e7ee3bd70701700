//! Profile resolution end to end: public view, owner-only private view, and
//! degradation to public-only on every private-branch failure.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use peopletag::core::{ContentId, PublicProfileMetadata, WalletAddress};
use peopletag::crypto::{Caller, EncryptedEnvelope};
use peopletag::store::{ContentStore, Ledger, MemoryStore, MetadataStore, SqliteStore, StoreError};
use peopletag::{DirectoryError, ErrorKind, Identity, ProfileDirectory};
use peopletag_testkit::{
    publish_profile, sample_owner_public, sample_payload, sample_public, TestWallet, SAMPLE_CIDS,
    SIGN_IN_MESSAGE,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A store holding one owner with a full profile.
fn published() -> anyhow::Result<(Arc<MemoryStore>, TestWallet)> {
    let store = Arc::new(MemoryStore::new());
    let owner = TestWallet::random();
    publish_profile(
        &store,
        &owner,
        sample_owner_public(&owner.address_hex()),
        &sample_payload(),
        SAMPLE_CIDS[0],
    )?;
    Ok((store, owner))
}

#[tokio::test]
async fn test_owner_gets_private_view() -> anyhow::Result<()> {
    init_tracing();
    let (store, owner) = published()?;
    let directory = ProfileDirectory::from_store(store);

    let response = directory
        .resolve(&owner.address_hex(), true, &owner.caller(SIGN_IN_MESSAGE))
        .await?;

    assert_eq!(response.user_address, owner.address_hex());
    assert_eq!(response.public_profile.display_name.as_deref(), Some("Alice"));
    assert_eq!(response.public_profile.public_tags, vec!["#DeFi", "#Berlin"]);
    assert_eq!(response.public_profile.location.as_deref(), Some("Berlin"));
    assert_eq!(
        response.public_profile.last_updated.as_deref(),
        Some("2024-05-01T12:00:00.000Z")
    );
    assert_eq!(
        response.profile_content_id.as_ref().map(ContentId::as_str),
        Some(SAMPLE_CIDS[0])
    );

    let private = response.private_profile.expect("owner sees private view");
    assert_eq!(private.bio.as_deref(), Some("gm"));
    assert_eq!(private.birth_date.as_deref(), Some("1990-01-01"));
    assert_eq!(private.private_tags, vec!["#Secret"]);
    assert_eq!(private.private_socials, vec![json!("https://lens.xyz/alice")]);
    Ok(())
}

#[tokio::test]
async fn test_owner_without_asking_gets_public_only() -> anyhow::Result<()> {
    let (store, owner) = published()?;
    let directory = ProfileDirectory::from_store(store);

    let response = directory
        .resolve(&owner.address_hex(), false, &owner.caller(SIGN_IN_MESSAGE))
        .await?;

    assert!(!response.has_private());
    assert!(response.profile_content_id.is_some());
    Ok(())
}

#[tokio::test]
async fn test_unverified_request_equals_public_request() -> anyhow::Result<()> {
    init_tracing();
    let (store, owner) = published()?;
    let stranger = TestWallet::random();
    let directory = ProfileDirectory::from_store(store);
    let address = owner.address_hex();

    let public = directory.resolve(&address, false, &Caller::Anonymous).await?;
    let anonymous = directory.resolve(&address, true, &Caller::Anonymous).await?;
    let other = directory
        .resolve(&address, true, &stranger.caller(SIGN_IN_MESSAGE))
        .await?;

    assert_eq!(anonymous, public);
    assert_eq!(other, public);
    assert!(!public.has_private());
    Ok(())
}

#[tokio::test]
async fn test_mixed_case_address_resolves() -> anyhow::Result<()> {
    let (store, owner) = published()?;
    let directory = ProfileDirectory::from_store(store);

    let upper = format!("0x{}", owner.address_hex()[2..].to_uppercase());
    let response = directory
        .resolve(&upper, true, &owner.caller(SIGN_IN_MESSAGE))
        .await?;

    assert!(response.has_private());
    Ok(())
}

#[tokio::test]
async fn test_missing_pointer_means_no_private_view() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let owner = TestWallet::random();
    store.put_profile(sample_public(&owner.address_hex(), &["#Art"]).with_username("bob"))?;
    let directory = ProfileDirectory::from_store(store);

    let response = directory
        .resolve(&owner.address_hex(), true, &owner.caller(SIGN_IN_MESSAGE))
        .await?;

    assert!(response.profile_content_id.is_none());
    assert!(!response.has_private());
    assert_eq!(response.public_profile.display_name.as_deref(), Some("bob"));
    assert!(response.public_profile.last_updated.is_none());
    Ok(())
}

#[tokio::test]
async fn test_wrong_key_degrades_to_public_only() -> anyhow::Result<()> {
    init_tracing();
    let (store, owner) = published()?;
    let directory = ProfileDirectory::from_store(store);

    // Valid proof, but over a different message: a different key.
    let caller = owner.caller("a different message");
    assert!(caller.is_owner_of(&owner.address()));

    let response = directory.resolve(&owner.address_hex(), true, &caller).await?;
    assert!(!response.has_private());
    assert!(response.profile_content_id.is_some());
    Ok(())
}

#[tokio::test]
async fn test_missing_blob_degrades_to_public_only() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let owner = TestWallet::random();
    store.put_profile(sample_owner_public(&owner.address_hex()))?;
    store.set_content_id(&owner.address(), SAMPLE_CIDS[1])?;
    let directory = ProfileDirectory::from_store(store);

    let response = directory
        .resolve(&owner.address_hex(), true, &owner.caller(SIGN_IN_MESSAGE))
        .await?;

    assert!(!response.has_private());
    assert_eq!(
        response.profile_content_id.as_ref().map(ContentId::as_str),
        Some(SAMPLE_CIDS[1])
    );
    Ok(())
}

#[tokio::test]
async fn test_corrupt_blob_degrades_to_public_only() -> anyhow::Result<()> {
    let (store, owner) = published()?;
    let id = store.set_content_id(&owner.address(), SAMPLE_CIDS[1])?;
    store.put_content(&id, &b"{\"ciphertext\":\"00\",\"nonce\":\"00\"}"[..])?;
    let directory = ProfileDirectory::from_store(store);

    let response = directory
        .resolve(&owner.address_hex(), true, &owner.caller(SIGN_IN_MESSAGE))
        .await?;

    assert!(!response.has_private());
    Ok(())
}

#[tokio::test]
async fn test_unknown_address_is_not_found() {
    let directory = ProfileDirectory::from_store(Arc::new(MemoryStore::new()));
    let nobody = TestWallet::random();

    let err = directory
        .resolve(&nobody.address_hex(), false, &Caller::Anonymous)
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::NotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_malformed_address_is_invalid_input() {
    let directory = ProfileDirectory::from_store(Arc::new(MemoryStore::new()));

    let cases = [
        "",
        "0x1234",
        "2c7536e3605d9c16a7a3d7b1898e529396a65c23",
        "0xZZ7536e3605d9c16a7a3d7b1898e529396a65c23",
    ];
    for bad in cases {
        let err = directory
            .resolve(bad, false, &Caller::Anonymous)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{:?}", bad);
    }
}

#[tokio::test]
async fn test_identity_paths() -> anyhow::Result<()> {
    let (store, owner) = published()?;
    let directory = ProfileDirectory::from_store(store);
    let address = owner.address_hex();

    // Full proof
    let full = directory
        .resolve_with_identity(&address, true, &owner.identity(SIGN_IN_MESSAGE))
        .await?;
    assert!(full.has_private());

    // No proof at all
    let anonymous = directory
        .resolve_with_identity(&address, true, &Identity::anonymous())
        .await?;
    assert!(!anonymous.has_private());
    Ok(())
}

#[tokio::test]
async fn test_rejected_proof_resolves_like_anonymous() -> anyhow::Result<()> {
    init_tracing();
    let (store, owner) = published()?;
    let directory = ProfileDirectory::from_store(store);
    let address = owner.address_hex();

    let signed_by_other = Identity::new(
        &address,
        Some(SIGN_IN_MESSAGE),
        Some(&TestWallet::random().sign_message(SIGN_IN_MESSAGE).to_hex()),
    );
    let garbled = Identity::new(&address, Some(SIGN_IN_MESSAGE), Some("0xdeadbeef"));
    let bad_claim = Identity::new(
        "not-an-address",
        Some(SIGN_IN_MESSAGE),
        Some(&owner.sign_message(SIGN_IN_MESSAGE).to_hex()),
    );

    for identity in [&signed_by_other, &garbled, &bad_claim] {
        assert!(identity.authenticate().is_err());
        for want_private in [true, false] {
            let anonymous = directory
                .resolve_with_identity(&address, want_private, &Identity::anonymous())
                .await?;
            let rejected = directory
                .resolve_with_identity(&address, want_private, identity)
                .await?;
            assert_eq!(rejected, anonymous, "{:?} want_private={}", identity, want_private);
            assert!(!rejected.has_private());
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_response_json_shape() -> anyhow::Result<()> {
    let (store, owner) = published()?;
    let directory = ProfileDirectory::from_store(store);

    let public = directory
        .resolve(&owner.address_hex(), false, &Caller::Anonymous)
        .await?;
    let json = serde_json::to_value(&public)?;

    assert_eq!(json["userAddress"], owner.address_hex());
    assert_eq!(json["publicProfile"]["displayName"], "Alice");
    assert_eq!(json["publicProfile"]["publicTags"], json!(["#DeFi", "#Berlin"]));
    assert_eq!(json["profileContentId"], SAMPLE_CIDS[0]);
    assert!(json.get("privateProfile").is_none());

    let full = directory
        .resolve(&owner.address_hex(), true, &owner.caller(SIGN_IN_MESSAGE))
        .await?;
    let json = serde_json::to_value(&full)?;
    assert_eq!(json["privateProfile"]["privateTags"], json!(["#Secret"]));
    assert_eq!(json["privateProfile"]["birthDate"], "1990-01-01");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Collaborator failures
// ─────────────────────────────────────────────────────────────────────────────

struct BrokenLedger;

#[async_trait]
impl Ledger for BrokenLedger {
    async fn get_content_id(
        &self,
        _: &WalletAddress,
    ) -> peopletag::store::Result<Option<ContentId>> {
        Err(StoreError::Transport("rpc endpoint unreachable".into()))
    }
}

struct BrokenMetadata;

#[async_trait]
impl MetadataStore for BrokenMetadata {
    async fn get_by_address(
        &self,
        _: &WalletAddress,
    ) -> peopletag::store::Result<Option<PublicProfileMetadata>> {
        Err(StoreError::Transport("connection reset".into()))
    }

    async fn get_all(&self) -> peopletag::store::Result<Vec<PublicProfileMetadata>> {
        Err(StoreError::Transport("connection reset".into()))
    }
}

struct BrokenContent;

#[async_trait]
impl ContentStore for BrokenContent {
    async fn fetch(&self, id: &ContentId) -> peopletag::store::Result<EncryptedEnvelope> {
        Err(StoreError::Transport(format!("gateway timeout for {}", id)))
    }
}

#[tokio::test]
async fn test_ledger_failure_is_treated_as_no_pointer() -> anyhow::Result<()> {
    init_tracing();
    let (store, owner) = published()?;
    let directory = ProfileDirectory::new(store.clone(), Arc::new(BrokenLedger), store);

    let response = directory
        .resolve(&owner.address_hex(), true, &owner.caller(SIGN_IN_MESSAGE))
        .await?;

    assert!(response.profile_content_id.is_none());
    assert!(!response.has_private());
    Ok(())
}

#[tokio::test]
async fn test_content_failure_degrades_to_public_only() -> anyhow::Result<()> {
    let (store, owner) = published()?;
    let directory = ProfileDirectory::new(store.clone(), store, Arc::new(BrokenContent));

    let response = directory
        .resolve(&owner.address_hex(), true, &owner.caller(SIGN_IN_MESSAGE))
        .await?;

    assert!(!response.has_private());
    assert!(response.profile_content_id.is_some());
    Ok(())
}

#[tokio::test]
async fn test_metadata_failure_is_surfaced() -> anyhow::Result<()> {
    let (store, owner) = published()?;
    let directory = ProfileDirectory::new(Arc::new(BrokenMetadata), store.clone(), store);

    let err = directory
        .resolve(&owner.address_hex(), false, &Caller::Anonymous)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);

    let err = directory.search_tags("DeFi", None, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite backend
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_resolve_over_sqlite() -> anyhow::Result<()> {
    let store = Arc::new(SqliteStore::open_memory()?);
    let owner = TestWallet::random();

    store.put_profile(&sample_owner_public(&owner.address_hex())).await?;
    let id = store.set_content_id(&owner.address(), SAMPLE_CIDS[2]).await?;
    store
        .put_envelope(&id, &owner.seal(SIGN_IN_MESSAGE, &sample_payload()))
        .await?;

    let directory = ProfileDirectory::from_store(store);
    let response = directory
        .resolve(&owner.address_hex(), true, &owner.caller(SIGN_IN_MESSAGE))
        .await?;

    let private = response.private_profile.expect("private view over sqlite");
    assert_eq!(private.private_tags, vec!["#Secret"]);
    Ok(())
}
