//! Rate-limited listing source wrapper.
//!
//! Wraps any [`ListingSource`] with a governor rate limiter. Politeness
//! toward the site, not a correctness requirement.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::error::SourceResult;
use crate::source::ListingSource;
use crate::types::{Listing, ListingDetail, SearchQuery};

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A listing source that waits for a rate-limit permit before each fetch.
pub struct RateLimitedSource<S: ListingSource> {
    inner: S,
    limiter: Arc<DirectRateLimiter>,
}

impl<S: ListingSource> RateLimitedSource<S> {
    /// Wrap a source with the default courtesy rate of one fetch every
    /// two seconds (burst of one).
    pub fn new(source: S) -> Self {
        Self::with_quota(
            source,
            Quota::with_period(std::time::Duration::from_secs(2))
                .unwrap_or_else(|| Quota::per_second(nonzero!(1u32))),
        )
    }

    /// Wrap a source allowing `requests_per_second` fetches per second.
    pub fn per_second(source: S, requests_per_second: NonZeroU32) -> Self {
        Self::with_quota(source, Quota::per_second(requests_per_second))
    }

    /// Wrap a source with a custom quota.
    pub fn with_quota(source: S, quota: Quota) -> Self {
        Self {
            inner: source,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    async fn wait_for_permit(&self) {
        self.limiter.until_ready().await;
    }
}

#[async_trait]
impl<S: ListingSource> ListingSource for RateLimitedSource<S> {
    async fn search(&self, query: &SearchQuery) -> SourceResult<Vec<Listing>> {
        self.wait_for_permit().await;
        self.inner.search(query).await
    }

    async fn detail(&self, url: &str) -> SourceResult<ListingDetail> {
        self.wait_for_permit().await;
        self.inner.detail(url).await
    }
}
