//! Proptest generators for property-based testing.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::Value;

use peopletag_core::{PrivateProfilePayload, PublicProfileMetadata, WalletAddress};

/// Generate a random address.
pub fn wallet_address() -> impl Strategy<Value = WalletAddress> {
    any::<[u8; 20]>().prop_map(WalletAddress::from_bytes)
}

/// Generate a tag, with or without the `#` marker.
pub fn tag() -> impl Strategy<Value = String> {
    "#?[A-Za-z][A-Za-z0-9]{0,11}".prop_map(String::from)
}

/// Generate up to `max` tags.
pub fn tags(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(tag(), 0..=max)
}

/// Generate a city from a small vocabulary, or none.
pub fn city() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("Berlin".to_string()),
        Just("Paris".to_string()),
        Just("Lisbon".to_string()),
    ])
}

/// Generate an optional timestamp between 2020 and 2030.
pub fn last_updated() -> impl Strategy<Value = Option<DateTime<Utc>>> {
    prop::option::of(
        (1_577_836_800i64..1_893_456_000i64)
            .prop_filter_map("valid timestamp", |s| Utc.timestamp_opt(s, 0).single()),
    )
}

/// Generate a social link.
pub fn social_link() -> impl Strategy<Value = Value> {
    "[a-z]{1,10}".prop_map(|handle| Value::String(format!("https://x.com/{}", handle)))
}

/// Parameters for generating a public profile record.
#[derive(Debug, Clone)]
pub struct ProfileParams {
    pub address: WalletAddress,
    pub tags: Vec<String>,
    pub display_name: Option<String>,
    pub city: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Arbitrary for ProfileParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            wallet_address(),
            tags(6),
            prop::option::of("[A-Za-z ]{1,16}"),
            city(),
            last_updated(),
        )
            .prop_map(|(address, tags, display_name, city, last_updated)| ProfileParams {
                address,
                tags,
                display_name,
                city,
                last_updated,
            })
            .boxed()
    }
}

/// Build the record described by `params`.
pub fn profile_from_params(params: &ProfileParams) -> PublicProfileMetadata {
    let mut meta = PublicProfileMetadata::new(params.address.to_hex()).with_tags(params.tags.clone());
    meta.display_name = params.display_name.clone();
    meta.city = params.city.clone();
    meta.last_updated = params.last_updated;
    meta
}

/// Generate a set of public records.
pub fn profiles(max: usize) -> impl Strategy<Value = Vec<PublicProfileMetadata>> {
    prop::collection::vec(any::<ProfileParams>(), 0..=max)
        .prop_map(|ps| ps.iter().map(profile_from_params).collect())
}

/// Generate a private document.
pub fn private_payload() -> impl Strategy<Value = PrivateProfilePayload> {
    (
        prop::option::of(".{0,64}"),
        prop::option::of("[0-9]{4}-[0-9]{2}-[0-9]{2}"),
        tags(6),
        prop::collection::vec(social_link(), 0..4),
    )
        .prop_map(|(bio, birth_date, tags, social_links)| PrivateProfilePayload {
            bio,
            birth_date,
            tags,
            social_links,
        })
}
