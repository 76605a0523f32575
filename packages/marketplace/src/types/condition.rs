//! The ranked condition vocabulary and its score table.

use serde::{Deserialize, Serialize};

/// Score assigned when the condition is unknown or unrecognized.
///
/// Equal to [`Condition::Good`], the midpoint of the vocabulary: absence of
/// data must not be penalized as if it were bad condition.
pub const NEUTRAL_CONDITION_SCORE: f64 = 0.5;

/// Ranked condition labels used by the marketplace.
///
/// Ordered best to worst. Raw labels are free text on the site (Japanese in
/// the grid, sometimes English in descriptions), so parsing is substring
/// based with the most specific labels checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// 新品、未使用 / "new/unused"
    New,
    /// 未使用に近い / "no noticeable wear"
    LikeNew,
    /// 目立った傷や汚れなし / "some wear"
    Good,
    /// やや傷や汚れあり / "significant wear"
    Fair,
    /// 全体的に状態が悪い / "junk"
    Poor,
}

impl Condition {
    /// Parse a raw site label. Returns `None` for unrecognized text, which
    /// scores as [`NEUTRAL_CONDITION_SCORE`].
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }

        // "未使用に近い" contains "未使用", so near-new must be checked
        // before new.
        if label.contains("未使用に近い") || label.contains("no noticeable wear") {
            Some(Condition::LikeNew)
        } else if label.contains("新品") || label.contains("未使用") || label.contains("new") {
            Some(Condition::New)
        } else if label.contains("目立った傷") || label.contains("some wear") {
            Some(Condition::Good)
        } else if label.contains("やや傷") || label.contains("significant wear") {
            Some(Condition::Fair)
        } else if label.contains("状態が悪い")
            || label.contains("傷や汚れあり")
            || label.contains("junk")
        {
            Some(Condition::Poor)
        } else {
            None
        }
    }

    /// Fixed score in [0, 1] for this label.
    pub fn score(self) -> f64 {
        match self {
            Condition::New => 1.0,
            Condition::LikeNew => 0.75,
            Condition::Good => 0.5,
            Condition::Fair => 0.25,
            Condition::Poor => 0.0,
        }
    }

    /// Score a raw, possibly absent label.
    pub fn score_label(label: Option<&str>) -> f64 {
        label
            .and_then(Condition::from_label)
            .map(Condition::score)
            .unwrap_or(NEUTRAL_CONDITION_SCORE)
    }
}
