//! User-selected priority modes controlling scoring weights.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::RankError;

/// What the user wants emphasized when ranking listings.
///
/// Parsed from oracle-supplied text at the tool boundary; unrecognized
/// values fail with `InvalidArgument` rather than silently defaulting.
/// An *omitted* priority defaults to `Balanced` via `Default`, which is the
/// documented policy for the analyze tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Cheapest first.
    Price,
    /// Best condition first.
    Condition,
    /// Best overall value.
    #[default]
    Balanced,
}

impl FromStr for Priority {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(Priority::Price),
            "condition" => Ok(Priority::Condition),
            "balanced" => Ok(Priority::Balanced),
            other => Err(RankError::invalid(format!(
                "unknown priority '{other}', expected one of: price, condition, balanced"
            ))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Price => write!(f, "price"),
            Priority::Condition => write!(f, "condition"),
            Priority::Balanced => write!(f, "balanced"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_modes_parse() {
        assert_eq!("price".parse::<Priority>().unwrap(), Priority::Price);
        assert_eq!(" Condition ".parse::<Priority>().unwrap(), Priority::Condition);
        assert_eq!("balanced".parse::<Priority>().unwrap(), Priority::Balanced);
    }

    #[test]
    fn unknown_mode_is_invalid_argument() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert!(matches!(err, RankError::InvalidArgument { .. }));
    }

    #[test]
    fn serde_uses_lowercase_labels() {
        assert_eq!(serde_json::to_string(&Priority::Price).unwrap(), "\"price\"");
        let parsed: Priority = serde_json::from_str("\"condition\"").unwrap();
        assert_eq!(parsed, Priority::Condition);
    }
}
