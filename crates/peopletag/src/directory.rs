//! The profile directory: profile resolution and tag search over the
//! injected collaborators.

use std::sync::Arc;

use tracing::{debug, warn};

use peopletag_core::{
    ContentId, MergedProfileResponse, PrivateProfile, PublicProfileMetadata, SearchQuery,
    SearchResults, WalletAddress,
};
use peopletag_crypto::{decrypt_profile, Caller, CryptoError, DerivedKey, Identity};
use peopletag_store::{ContentStore, Ledger, MetadataStore};

use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, Result};

/// Outcome of the private half of a resolution.
enum PrivateBranch {
    /// Preconditions not met; nothing was attempted.
    Skipped(&'static str),
    /// Decrypted and merged.
    Merged(PrivateProfile),
    /// Attempted and failed. Looks the same as `Skipped` to the caller.
    PublicOnly(DirectoryError),
}

/// Resolves profiles and answers tag searches.
///
/// Holds no mutable state; every call works on what the collaborators
/// return for that call.
pub struct ProfileDirectory<M, L, C> {
    metadata: Arc<M>,
    ledger: Arc<L>,
    content: Arc<C>,
    config: DirectoryConfig,
}

impl<M, L, C> ProfileDirectory<M, L, C>
where
    M: MetadataStore,
    L: Ledger,
    C: ContentStore,
{
    /// Create a directory with the default configuration.
    pub fn new(metadata: Arc<M>, ledger: Arc<L>, content: Arc<C>) -> Self {
        Self {
            metadata,
            ledger,
            content,
            config: DirectoryConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: DirectoryConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve one profile.
    ///
    /// The public part is always returned when a record exists. The private
    /// part is attached only when `want_private` is set, `caller` proved
    /// ownership of `user_address` and has a key, a content pointer exists,
    /// and fetching plus decryption succeed. Any failure past that point
    /// degrades to the public-only response.
    #[tracing::instrument(skip(self, caller))]
    pub async fn resolve(
        &self,
        user_address: &str,
        want_private: bool,
        caller: &Caller,
    ) -> Result<MergedProfileResponse> {
        let address = WalletAddress::parse(user_address)?;

        let metadata = self
            .metadata
            .get_by_address(&address)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(address.to_hex()))?;

        let content_id = match self.ledger.get_content_id(&address).await {
            Ok(id) => id,
            Err(e) => {
                warn!(%address, "content pointer lookup failed, treating as unset: {}", e);
                None
            }
        };
        debug!(%address, has_pointer = content_id.is_some(), "public profile found");

        let response = MergedProfileResponse::public_only(&metadata, content_id.clone());

        let branch = match (want_private, caller.key_for(&address), content_id) {
            (false, _, _) => PrivateBranch::Skipped("not requested"),
            (true, None, _) if !caller.is_owner_of(&address) => {
                PrivateBranch::Skipped("caller is not the owner")
            }
            (true, None, _) => PrivateBranch::Skipped("no derived key"),
            (true, Some(_), None) => PrivateBranch::Skipped("no content pointer"),
            (true, Some(key), Some(id)) => match self.open_private(&id, key, &metadata).await {
                Ok(private) => PrivateBranch::Merged(private),
                Err(e) => PrivateBranch::PublicOnly(e),
            },
        };

        match branch {
            PrivateBranch::Merged(private) => {
                debug!(%address, "private profile merged");
                Ok(response.with_private(private))
            }
            PrivateBranch::Skipped(reason) => {
                debug!(%address, reason, "private profile skipped");
                Ok(response)
            }
            PrivateBranch::PublicOnly(e) => {
                warn!(%address, "private profile unavailable, returning public only: {}", e);
                Ok(response)
            }
        }
    }

    /// Authenticate `identity` and resolve.
    ///
    /// A missing proof and a proof that fails verification both resolve as
    /// anonymous access. Use [`Identity::authenticate`] directly to reject
    /// bad proofs outright.
    pub async fn resolve_with_identity(
        &self,
        user_address: &str,
        want_private: bool,
        identity: &Identity,
    ) -> Result<MergedProfileResponse> {
        let caller = match identity.authenticate() {
            Ok(caller) => caller,
            Err(CryptoError::AuthenticationFailure(reason)) => {
                warn!(
                    claimed = %identity.address,
                    "identity proof rejected, resolving anonymously: {}",
                    reason
                );
                Caller::Anonymous
            }
            Err(e) => return Err(e.into()),
        };
        self.resolve(user_address, want_private, &caller).await
    }

    async fn open_private(
        &self,
        id: &ContentId,
        key: &DerivedKey,
        metadata: &PublicProfileMetadata,
    ) -> Result<PrivateProfile> {
        let envelope = self.content.fetch(id).await?;
        let payload = decrypt_profile(&envelope, key.as_bytes())?;
        Ok(PrivateProfile::merge(payload, metadata))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    /// Rank every public profile against `query`.
    #[tracing::instrument(skip(self, query), fields(tags = ?query.tags(), limit = query.limit()))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        let max = self.config.search.max_limit;
        if query.limit() > max {
            return Err(peopletag_core::CoreError::InvalidQuery(format!(
                "limit cannot exceed {}",
                max
            ))
            .into());
        }

        let profiles = self.metadata.get_all().await?;
        let results = peopletag_core::search(&profiles, query);
        debug!(scanned = profiles.len(), total = results.total, "search complete");

        Ok(results)
    }

    /// Search from raw request attributes: a comma-separated tag list, an
    /// optional limit and an optional city.
    pub async fn search_tags(
        &self,
        tags: &str,
        limit: Option<usize>,
        city: Option<&str>,
    ) -> Result<SearchResults> {
        let search = &self.config.search;
        let query = SearchQuery::with_max_limit(
            tags.split(','),
            limit.unwrap_or(search.default_limit),
            city,
            search.max_limit,
        )?;
        self.search(&query).await
    }
}

impl<S> ProfileDirectory<S, S, S>
where
    S: MetadataStore + Ledger + ContentStore,
{
    /// Use one store for all three collaborators.
    pub fn from_store(store: Arc<S>) -> Self {
        Self::new(store.clone(), store.clone(), store)
    }
}
