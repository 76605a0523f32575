//! Structured error reports returned to the model.
//!
//! Tool failures never cross the oracle boundary as panics or transport
//! errors; they serialize into `{"error": {"kind": ..., "message": ...}}`
//! so the model can read the failure and adapt.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use marketplace::{RankError, SourceError};

/// A tool failure in a shape the model can reason about.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ErrorReport {
    /// Machine-readable failure kind: "invalid_argument",
    /// "source_unavailable", "timeout", "parse_failure", or "tool_error".
    pub kind: String,

    /// Human-readable explanation.
    pub message: String,
}

impl ErrorReport {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl From<&SourceError> for ErrorReport {
    fn from(error: &SourceError) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}

impl From<&RankError> for ErrorReport {
    fn from(error: &RankError) -> Self {
        Self::new("invalid_argument", error.to_string())
    }
}

/// A tool result: either the payload or an error report.
///
/// Serializes untagged, so success looks like the payload itself and
/// failure looks like `{"error": {...}}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ToolReply<T: Serialize> {
    Ok(T),
    Err { error: ErrorReport },
}

impl<T: Serialize> ToolReply<T> {
    pub fn error(report: impl Into<ErrorReport>) -> Self {
        ToolReply::Err {
            error: report.into(),
        }
    }
}

impl From<SourceError> for ErrorReport {
    fn from(error: SourceError) -> Self {
        Self::from(&error)
    }
}

impl From<RankError> for ErrorReport {
    fn from(error: RankError) -> Self {
        Self::from(&error)
    }
}
