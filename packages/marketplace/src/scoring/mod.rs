//! The scoring engine: weight tables and the pure ranking function.

pub mod engine;
pub mod weights;

pub use engine::{filter_available, rank, RankedListing, DEFAULT_TOP_N};
pub use weights::{WeightTable, Weights};
