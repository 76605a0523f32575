//! Testing utilities: listing fixtures and a mock listing source.
//!
//! Useful for exercising the scoring engine and the agent tools without
//! touching the network.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::error::{SourceError, SourceResult};
use crate::source::ListingSource;
use crate::types::{Listing, ListingDetail, SearchQuery};

/// Build a listing fixture with the fields scoring cares about.
pub fn listing(id: &str, title: &str, price: Option<u64>, condition: Option<&str>) -> Listing {
    Listing {
        id: Some(id.to_string()),
        title: title.to_string(),
        price,
        url: format!("https://jp.mercari.com/item/{id}"),
        condition: condition.map(String::from),
        sold_out: false,
    }
}

/// A mock listing source returning queued results.
///
/// Search results are consumed in FIFO order; an exhausted queue reports
/// `SourceUnavailable`, which doubles as a way to test failure paths.
#[derive(Default)]
pub struct MockSource {
    search_results: Mutex<VecDeque<SourceResult<Vec<Listing>>>>,
    details: Mutex<HashMap<String, ListingDetail>>,
    queries_seen: Mutex<Vec<SearchQuery>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful search result.
    pub fn with_search_result(self, listings: Vec<Listing>) -> Self {
        self.search_results.lock().unwrap().push_back(Ok(listings));
        self
    }

    /// Queue a search failure.
    pub fn with_search_error(self, error: SourceError) -> Self {
        self.search_results.lock().unwrap().push_back(Err(error));
        self
    }

    /// Register a detail page for a URL.
    pub fn with_detail(self, detail: ListingDetail) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(detail.url.clone(), detail);
        self
    }

    /// Queries this source has served, for assertions.
    pub fn queries_seen(&self) -> Vec<SearchQuery> {
        self.queries_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingSource for MockSource {
    async fn search(&self, query: &SearchQuery) -> SourceResult<Vec<Listing>> {
        self.queries_seen.lock().unwrap().push(query.clone());
        self.search_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(SourceError::Unavailable(
                    "mock source has no more queued results".into(),
                ))
            })
    }

    async fn detail(&self, url: &str) -> SourceResult<ListingDetail> {
        self.details
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::Unavailable(format!("no mock detail for {url}")))
    }
}
