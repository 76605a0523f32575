//! Typed errors for the marketplace crate.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on failure kinds. An empty search or analysis result is not an error
//! anywhere in this crate; only malformed whole-batch arguments and listing
//! source failures are.

use thiserror::Error;

/// Errors from the listing source (network + page extraction).
#[derive(Debug, Error)]
pub enum SourceError {
    /// The marketplace could not be reached or refused the request.
    #[error("listing source unavailable: {0}")]
    Unavailable(String),

    /// The fetch exceeded the configured timeout.
    #[error("timed out fetching: {url}")]
    Timeout { url: String },

    /// The page was fetched but its structure did not match the expected
    /// layout (site markup changed).
    #[error("failed to parse listing page: {0}")]
    Parse(String),
}

impl SourceError {
    /// Short machine-readable kind, used in tool error reports.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Unavailable(_) => "source_unavailable",
            SourceError::Timeout { .. } => "timeout",
            SourceError::Parse(_) => "parse_failure",
        }
    }
}

/// Errors from ranking a batch of listings.
///
/// Malformed individual listings never fail the batch; they degrade to
/// neutral scores instead.
#[derive(Debug, Error)]
pub enum RankError {
    /// A whole-batch argument was malformed (bad priority, zero top_n).
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl RankError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        RankError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Result type alias for listing source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for ranking operations.
pub type RankResult<T> = std::result::Result<T, RankError>;
