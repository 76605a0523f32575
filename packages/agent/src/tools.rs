//! The three tools exposed to the model.
//!
//! Field names and shapes here are the binding contract toward the oracle:
//! the system prompt is written against them, so renames are breaking
//! changes. Each tool validates its own arguments and reports failures as
//! structured [`ErrorReport`]s inside its output.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use marketplace::{
    filter_available, rank, Listing, ListingDetail, ListingSource, Priority, RankedListing,
    SearchQuery, SortOrder, WeightTable, DEFAULT_TOP_N,
};
use openai_client::Tool;

use crate::report::{ErrorReport, ToolReply};

// ---------------------------------------------------------------------------
// search_mercari
// ---------------------------------------------------------------------------

/// Arguments for the search tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// Search keyword, Japanese or English.
    pub keyword: String,

    /// Minimum price in JPY.
    #[serde(default)]
    pub min_price: Option<u64>,

    /// Maximum price in JPY.
    #[serde(default)]
    pub max_price: Option<u64>,

    /// Maximum number of results (1-50, default 20).
    #[serde(default)]
    pub max_results: Option<usize>,

    /// Sort order: newest, price_asc, or price_desc.
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

/// Successful search payload.
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub keyword: String,
    pub total_results: usize,
    pub listings: Vec<Listing>,
}

/// Search Mercari Japan for listings matching a keyword.
pub struct SearchMercari<S> {
    source: Arc<S>,
}

impl<S> SearchMercari<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: ListingSource + 'static> Tool for SearchMercari<S> {
    const NAME: &'static str = "search_mercari";
    type Args = SearchArgs;
    type Output = ToolReply<SearchOutput>;
    type Error = std::convert::Infallible;

    fn description(&self) -> &str {
        "Search for products on Mercari Japan using a keyword and optional price \
         filters. Returns up to 50 listings with name, price, URL, and sold status. \
         Use this first whenever the user wants to find items."
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let query = match SearchQuery::new(
            args.keyword,
            args.min_price,
            args.max_price,
            args.max_results,
            args.sort,
        ) {
            Ok(query) => query,
            Err(e) => return Ok(ToolReply::error(ErrorReport::from(e))),
        };

        match self.source.search(&query).await {
            Ok(listings) => Ok(ToolReply::Ok(SearchOutput {
                keyword: query.keyword,
                total_results: listings.len(),
                listings,
            })),
            Err(e) => {
                warn!(keyword = %query.keyword, error = %e, "Search failed");
                Ok(ToolReply::error(ErrorReport::from(e)))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// analyze_listings
// ---------------------------------------------------------------------------

/// Arguments for the analyze tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnalyzeArgs {
    /// The listings array from a previous search_mercari result.
    pub listings: Vec<Listing>,

    /// Ranking priority: price, condition, or balanced. Defaults to
    /// balanced when omitted.
    #[serde(default)]
    pub priority: Option<String>,

    /// Maximum budget in JPY; listings above it are dropped before scoring.
    #[serde(default)]
    pub max_budget: Option<u64>,

    /// How many recommendations to return (default 3).
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Successful analysis payload.
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub total_analyzed: usize,
    pub priority: Priority,
    pub recommendations: Vec<RankedListing>,
}

/// Score and rank listings, returning the top recommendations.
pub struct AnalyzeListings {
    weights: WeightTable,
}

impl AnalyzeListings {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }
}

impl Default for AnalyzeListings {
    fn default() -> Self {
        Self::new(WeightTable::default())
    }
}

#[async_trait]
impl Tool for AnalyzeListings {
    const NAME: &'static str = "analyze_listings";
    type Args = AnalyzeArgs;
    type Output = ToolReply<AnalyzeOutput>;
    type Error = std::convert::Infallible;

    fn description(&self) -> &str {
        "Analyze listings from search_mercari and pick the top recommendations. \
         Pass the 'listings' array from the search result. Priority controls the \
         ranking: 'price' for cheapest, 'condition' for best condition, \
         'balanced' for best value. Use this after every search."
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        // Omitted priority defaults to balanced; unrecognized text is an
        // InvalidArgument the model gets to correct.
        let priority = match args.priority.as_deref() {
            None => Priority::default(),
            Some(text) => match text.parse::<Priority>() {
                Ok(priority) => priority,
                Err(e) => return Ok(ToolReply::error(ErrorReport::from(e))),
            },
        };

        let available = filter_available(&args.listings, args.max_budget);
        let top_n = args.top_n.unwrap_or(DEFAULT_TOP_N);

        match rank(&available, priority, top_n, &self.weights) {
            Ok(recommendations) => Ok(ToolReply::Ok(AnalyzeOutput {
                total_analyzed: available.len(),
                priority,
                recommendations,
            })),
            Err(e) => Ok(ToolReply::error(ErrorReport::from(e))),
        }
    }
}

// ---------------------------------------------------------------------------
// get_listing_details
// ---------------------------------------------------------------------------

/// Arguments for the detail tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DetailArgs {
    /// Full listing URL, e.g. "https://jp.mercari.com/item/m12345678901".
    pub url: String,
}

/// Successful detail payload.
#[derive(Debug, Serialize)]
pub struct DetailOutput {
    pub listing: ListingDetail,
}

/// Fetch full details for one listing by visiting its page.
pub struct GetListingDetails<S> {
    source: Arc<S>,
}

impl<S> GetListingDetails<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: ListingSource + 'static> Tool for GetListingDetails<S> {
    const NAME: &'static str = "get_listing_details";
    type Args = DetailArgs;
    type Output = ToolReply<DetailOutput>;
    type Error = std::convert::Infallible;

    fn description(&self) -> &str {
        "Fetch complete details for one listing by visiting its page: full \
         description, condition, seller, and shipping info. Costs a full page \
         load, so call it for one promising listing at a time, never in bulk."
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        if args.url.trim().is_empty() {
            return Ok(ToolReply::error(ErrorReport::new(
                "invalid_argument",
                "url must not be empty",
            )));
        }

        match self.source.detail(&args.url).await {
            Ok(listing) => Ok(ToolReply::Ok(DetailOutput { listing })),
            Err(e) => {
                warn!(url = %args.url, error = %e, "Detail fetch failed");
                Ok(ToolReply::error(ErrorReport::from(e)))
            }
        }
    }
}
