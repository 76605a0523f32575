//! Domain types: listings, the condition vocabulary, priorities, queries.

pub mod condition;
pub mod listing;
pub mod priority;
pub mod query;

pub use condition::{Condition, NEUTRAL_CONDITION_SCORE};
pub use listing::{Listing, ListingDetail};
pub use priority::Priority;
pub use query::{SearchQuery, SortOrder, DEFAULT_MAX_RESULTS, MAX_RESULTS_CEILING};
