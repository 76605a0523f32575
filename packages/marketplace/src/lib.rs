//! Marketplace core: listing model, scoring engine, and listing source.
//!
//! The scoring engine ([`scoring::rank`]) is a pure function over a batch
//! of [`types::Listing`]s: it computes price, condition, and completeness
//! sub-scores, combines them with the priority's weight table, and returns
//! a ranked top-N with deterministic justification strings.
//!
//! The [`source::ListingSource`] trait is the seam to the live site; the
//! scoring side never performs I/O.

pub mod error;
pub mod scoring;
pub mod source;
pub mod testing;
pub mod types;

pub use error::{RankError, RankResult, SourceError, SourceResult};
pub use scoring::{filter_available, rank, RankedListing, WeightTable, DEFAULT_TOP_N};
pub use source::{ListingSource, MercariSource, MercariSourceConfig, RateLimitedSource};
pub use types::{
    Condition, Listing, ListingDetail, Priority, SearchQuery, SortOrder, DEFAULT_MAX_RESULTS,
    MAX_RESULTS_CEILING,
};
