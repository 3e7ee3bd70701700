//! Profile documents: the public record, the decrypted private payload, and
//! the merged view handed back to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::{format_timestamp, ContentId};

/// Public profile metadata as held by the metadata store.
///
/// Read-only to this crate. Field names follow the stored document
/// (`tagsList`, `socialLinks`, camelCase elsewhere).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileMetadata {
    /// Address as stored. Lookups use the lowercased form.
    pub wallet_address: String,

    /// Public tags in author order, e.g. `#DeFi`.
    #[serde(rename = "tagsList", default, deserialize_with = "nullable_vec")]
    pub tags: Vec<String>,

    #[serde(default, alias = "name")]
    pub display_name: Option<String>,

    /// Handle used when no display name is set.
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    /// Public social links. Only consulted to hide duplicates from the private view.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub social_links: Vec<Value>,

    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl PublicProfileMetadata {
    /// Start a record for the given address with every optional field empty.
    pub fn new(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            tags: Vec::new(),
            display_name: None,
            username: None,
            city: None,
            social_links: Vec::new(),
            last_updated: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_social_links(mut self, links: Vec<Value>) -> Self {
        self.social_links = links;
        self
    }

    pub fn updated_at(mut self, ts: DateTime<Utc>) -> Self {
        self.last_updated = Some(ts);
        self
    }

    /// Display name, falling back to the username. Empty strings count as unset.
    pub fn resolved_display_name(&self) -> Option<&str> {
        non_empty(self.display_name.as_deref()).or_else(|| non_empty(self.username.as_deref()))
    }

    /// City, with an empty string treated as unset.
    pub fn location(&self) -> Option<&str> {
        non_empty(self.city.as_deref())
    }

    /// ISO-8601 rendering of `last_updated`.
    pub fn last_updated_iso(&self) -> Option<String> {
        self.last_updated.as_ref().map(format_timestamp)
    }
}

/// The decrypted private document.
///
/// Only exists for the duration of one successful decryption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateProfilePayload {
    #[serde(default)]
    pub bio: Option<String>,

    #[serde(default)]
    pub birth_date: Option<String>,

    #[serde(rename = "tagsList", default, deserialize_with = "nullable_vec")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "nullable_vec")]
    pub social_links: Vec<Value>,
}

/// Public portion of a resolved profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub display_name: Option<String>,
    pub public_tags: Vec<String>,
    pub location: Option<String>,
    pub last_updated: Option<String>,
}

/// Private portion of a resolved profile, present only for the verified owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateProfile {
    pub bio: Option<String>,
    pub birth_date: Option<String>,
    pub private_tags: Vec<String>,
    pub private_socials: Vec<Value>,
}

impl PrivateProfile {
    /// Build the private view, hiding anything already public.
    ///
    /// `private_tags` and `private_socials` are the payload lists minus the
    /// entries of the matching public list, in payload order. Comparison is
    /// exact.
    pub fn merge(payload: PrivateProfilePayload, public: &PublicProfileMetadata) -> Self {
        Self {
            bio: payload.bio.filter(|s| !s.is_empty()),
            birth_date: payload.birth_date.filter(|s| !s.is_empty()),
            private_tags: difference(payload.tags, &public.tags),
            private_socials: difference(payload.social_links, &public.social_links),
        }
    }
}

/// The response for one profile resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedProfileResponse {
    pub user_address: String,
    pub public_profile: PublicProfile,
    pub profile_content_id: Option<ContentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_profile: Option<PrivateProfile>,
}

impl MergedProfileResponse {
    /// Build the public-only response from stored metadata.
    pub fn public_only(metadata: &PublicProfileMetadata, content_id: Option<ContentId>) -> Self {
        Self {
            user_address: metadata.wallet_address.clone(),
            public_profile: PublicProfile {
                display_name: metadata.resolved_display_name().map(String::from),
                public_tags: metadata.tags.clone(),
                location: metadata.location().map(String::from),
                last_updated: metadata.last_updated_iso(),
            },
            profile_content_id: content_id,
            private_profile: None,
        }
    }

    /// Attach the private view.
    pub fn with_private(mut self, private: PrivateProfile) -> Self {
        self.private_profile = Some(private);
        self
    }

    pub fn has_private(&self) -> bool {
        self.private_profile.is_some()
    }
}

fn difference<T: PartialEq>(private: Vec<T>, public: &[T]) -> Vec<T> {
    private
        .into_iter()
        .filter(|item| !public.contains(item))
        .collect()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Stored documents sometimes carry `null` where a list is expected.
fn nullable_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
