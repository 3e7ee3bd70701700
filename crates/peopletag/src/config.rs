//! Directory configuration.

use serde::Deserialize;

use peopletag_core::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};

use crate::error::{DirectoryError, Result};

/// Configuration for a [`ProfileDirectory`](crate::ProfileDirectory).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Search limits.
    pub search: SearchConfig,
}

/// Limits applied to tag search requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Limit used when a request names none.
    pub default_limit: usize,
    /// Largest limit a request may ask for.
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_SEARCH_LIMIT,
            max_limit: MAX_SEARCH_LIMIT,
        }
    }
}

impl DirectoryConfig {
    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if search.max_limit == 0 || search.max_limit > MAX_SEARCH_LIMIT {
            return Err(DirectoryError::InvalidConfig(format!(
                "search.max_limit must be between 1 and {}",
                MAX_SEARCH_LIMIT
            )));
        }
        if search.default_limit == 0 || search.default_limit > search.max_limit {
            return Err(DirectoryError::InvalidConfig(
                "search.default_limit must be between 1 and search.max_limit".into(),
            ));
        }
        Ok(())
    }
}
