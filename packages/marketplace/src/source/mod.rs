//! Listing source: the seam between the scoring core and the live site.

pub mod mercari;
pub mod rate_limited;

pub use mercari::{MercariSource, MercariSourceConfig};
pub use rate_limited::RateLimitedSource;

use async_trait::async_trait;

use crate::error::SourceResult;
use crate::types::{Listing, ListingDetail, SearchQuery};

/// A source of marketplace listings.
///
/// Implementations hold no mutable state per call, so independent searches
/// may run concurrently. The live implementation is the only blocking
/// point in the pipeline and enforces its own timeout.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Run a search and return the listings found, in page order.
    ///
    /// Zero results is a normal outcome, not an error.
    async fn search(&self, query: &SearchQuery) -> SourceResult<Vec<Listing>>;

    /// Fetch full attributes for one listing by visiting its page.
    async fn detail(&self, url: &str) -> SourceResult<ListingDetail>;
}
