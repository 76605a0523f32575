//! Search query parameters for the listing source.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::RankError;

/// Largest number of results one search may request.
///
/// Caps latency and the size of the tool result fed back to the model.
pub const MAX_RESULTS_CEILING: usize = 50;

/// Default number of results when the caller does not say.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Sort order for search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Newest listings first.
    #[default]
    Newest,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

impl SortOrder {
    /// Value of the site's `sort` query parameter.
    pub fn as_query_param(self) -> &'static str {
        match self {
            SortOrder::Newest => "created_time",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_param())
    }
}

/// A validated search request toward the listing source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub max_results: usize,
    pub sort: SortOrder,
}

impl SearchQuery {
    /// Build a validated query.
    ///
    /// Rejects empty keywords and inverted price bounds; clamps
    /// `max_results` into `1..=MAX_RESULTS_CEILING`.
    pub fn new(
        keyword: impl Into<String>,
        min_price: Option<u64>,
        max_price: Option<u64>,
        max_results: Option<usize>,
        sort: Option<SortOrder>,
    ) -> Result<Self, RankError> {
        let keyword = keyword.into();
        if keyword.trim().is_empty() {
            return Err(RankError::invalid("keyword must not be empty"));
        }

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(RankError::invalid(format!(
                    "min_price ({min}) exceeds max_price ({max})"
                )));
            }
        }

        let max_results = max_results
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, MAX_RESULTS_CEILING);

        Ok(Self {
            keyword,
            min_price,
            max_price,
            max_results,
            sort: sort.unwrap_or_default(),
        })
    }

    /// Shortcut for a keyword-only query with defaults.
    pub fn keyword_only(keyword: impl Into<String>) -> Result<Self, RankError> {
        Self::new(keyword, None, None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_keyword_is_rejected() {
        let err = SearchQuery::keyword_only("   ").unwrap_err();
        assert!(matches!(err, RankError::InvalidArgument { .. }));
    }

    #[test]
    fn inverted_price_bounds_are_rejected() {
        let err = SearchQuery::new("iPhone", Some(5000), Some(100), None, None).unwrap_err();
        assert!(matches!(err, RankError::InvalidArgument { .. }));
    }

    #[test]
    fn max_results_is_clamped() {
        let query = SearchQuery::new("iPhone", None, None, Some(500), None).unwrap();
        assert_eq!(query.max_results, MAX_RESULTS_CEILING);

        let query = SearchQuery::new("iPhone", None, None, Some(0), None).unwrap();
        assert_eq!(query.max_results, 1);

        let query = SearchQuery::keyword_only("iPhone").unwrap();
        assert_eq!(query.max_results, DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn sort_maps_to_site_parameters() {
        assert_eq!(SortOrder::Newest.as_query_param(), "created_time");
        assert_eq!(SortOrder::PriceAsc.as_query_param(), "price_asc");
        assert_eq!(SortOrder::PriceDesc.as_query_param(), "price_desc");
    }
}
