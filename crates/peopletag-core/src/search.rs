//! Tag search over public profile metadata.
//!
//! A profile matches when any requested tag is a case-insensitive substring
//! of any of its stored tags, in either bare or `#`-marked form. Results are
//! ranked by how many distinct requested tags matched, then by recency.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::profile::PublicProfileMetadata;

/// Hard upper bound on `limit`.
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Limit used when the caller does not ask for one.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Leading marker conventionally carried by stored tags.
pub const TAG_MARKER: char = '#';

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    tags: Vec<String>,
    limit: usize,
    city: Option<String>,
}

impl SearchQuery {
    /// Build a query capped at [`MAX_SEARCH_LIMIT`].
    pub fn new<I, S>(tags: I, limit: usize, city: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_max_limit(tags, limit, city, MAX_SEARCH_LIMIT)
    }

    /// Build a query with an explicit cap on `limit`.
    ///
    /// Tags are trimmed, blanks dropped, and case-insensitive duplicates
    /// removed (first occurrence wins). A blank city means no city filter.
    pub fn with_max_limit<I, S>(
        tags: I,
        limit: usize,
        city: Option<&str>,
        max_limit: usize,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = Vec::new();
        let mut cleaned = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if tag.is_empty() {
                continue;
            }
            let folded = tag.to_lowercase();
            if !seen.contains(&folded) {
                seen.push(folded);
                cleaned.push(tag.to_string());
            }
        }

        if cleaned.is_empty() {
            return Err(CoreError::InvalidQuery(
                "at least one valid tag is required".into(),
            ));
        }
        if limit < 1 {
            return Err(CoreError::InvalidQuery("limit must be a positive number".into()));
        }
        if limit > max_limit {
            return Err(CoreError::InvalidQuery(format!(
                "limit cannot exceed {}",
                max_limit
            )));
        }

        Ok(Self {
            tags: cleaned,
            limit,
            city: city.filter(|c| !c.is_empty()).map(String::from),
        })
    }

    /// Parse a comma-separated tag list such as `"DeFi, Berlin"`.
    pub fn parse(tags: &str, limit: Option<usize>, city: Option<&str>) -> Result<Self> {
        Self::new(tags.split(','), limit.unwrap_or(DEFAULT_SEARCH_LIMIT), city)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Number of distinct requested tags matching `profile`, or `None` if
    /// the profile is excluded (no tag hit, or wrong city).
    pub fn score(&self, profile: &PublicProfileMetadata) -> Option<usize> {
        score_with(&self.terms(), self.city(), profile)
    }

    fn terms(&self) -> Vec<TagTerm> {
        self.tags.iter().map(|t| TagTerm::new(t)).collect()
    }
}

/// One requested tag in both of its matchable forms.
struct TagTerm {
    bare: String,
    marked: String,
}

impl TagTerm {
    fn new(tag: &str) -> Self {
        let bare = tag.to_lowercase();
        let marked = if bare.starts_with(TAG_MARKER) {
            bare.clone()
        } else {
            format!("{}{}", TAG_MARKER, bare)
        };
        Self { bare, marked }
    }

    fn matches(&self, stored: &str) -> bool {
        stored.contains(&self.marked) || stored.contains(&self.bare)
    }
}

fn score_with(terms: &[TagTerm], city: Option<&str>, profile: &PublicProfileMetadata) -> Option<usize> {
    if let Some(city) = city {
        let same_city = profile
            .city
            .as_deref()
            .map_or(false, |c| c.to_lowercase() == city.to_lowercase());
        if !same_city {
            return None;
        }
    }

    let stored: Vec<String> = profile.tags.iter().map(|t| t.to_lowercase()).collect();
    let hits = terms
        .iter()
        .filter(|term| stored.iter().any(|s| term.matches(s)))
        .count();

    (hits > 0).then_some(hits)
}

/// One profile in a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub user_address: String,
    pub public_tags: Vec<String>,
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub last_updated: Option<String>,
}

impl From<&PublicProfileMetadata> for SearchResultItem {
    fn from(profile: &PublicProfileMetadata) -> Self {
        Self {
            user_address: profile.wallet_address.clone(),
            public_tags: profile.tags.clone(),
            display_name: profile.resolved_display_name().map(String::from),
            location: profile.location().map(String::from),
            last_updated: profile.last_updated_iso(),
        }
    }
}

/// Ranked, truncated search output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// The top `limit` matches, best first.
    pub items: Vec<SearchResultItem>,
    /// Number of matches before truncation.
    pub total: usize,
}

/// Rank `profiles` against `query`.
///
/// Order: matched-tag count descending, then `last_updated` descending with
/// missing timestamps last. The sort is stable, so remaining ties keep
/// snapshot order. Input is never modified.
pub fn search(profiles: &[PublicProfileMetadata], query: &SearchQuery) -> SearchResults {
    let terms = query.terms();

    let mut matched: Vec<(usize, &PublicProfileMetadata)> = profiles
        .iter()
        .filter_map(|p| score_with(&terms, query.city(), p).map(|hits| (hits, p)))
        .collect();

    matched.sort_by(|(a_hits, a), (b_hits, b)| rank(*a_hits, a, *b_hits, b));

    let total = matched.len();
    let items = matched
        .into_iter()
        .take(query.limit())
        .map(|(_, p)| SearchResultItem::from(p))
        .collect();

    SearchResults { items, total }
}

fn rank(
    a_hits: usize,
    a: &PublicProfileMetadata,
    b_hits: usize,
    b: &PublicProfileMetadata,
) -> Ordering {
    // `None < Some(_)`, so reversing puts undated profiles last.
    b_hits
        .cmp(&a_hits)
        .then_with(|| b.last_updated.cmp(&a.last_updated))
}
