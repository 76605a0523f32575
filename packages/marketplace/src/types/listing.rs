//! Listing records as returned by the marketplace.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One product entry from a search-results page.
///
/// Listings are immutable once fetched; the scoring engine only reads them.
/// Most fields are optional because the results grid omits data freely.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Listing {
    /// Marketplace item id (e.g. "m12345678901"). Absent when the grid
    /// markup hides it; the URL then serves as identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Listing title; may contain Japanese text, may be empty.
    #[serde(default)]
    pub title: String,

    /// Price in JPY. `None` means unknown, not zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,

    /// Canonical link to the listing page.
    pub url: String,

    /// Raw condition label as shown on the site, when visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Whether the listing is marked sold.
    #[serde(default)]
    pub sold_out: bool,
}

impl Listing {
    /// Stable identity for this listing within a result set.
    pub fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.url)
    }

    /// Price formatted for display, "N/A" when unknown.
    pub fn price_display(&self) -> String {
        match self.price {
            Some(price) => format!("¥{}", group_thousands(price)),
            None => "N/A".to_string(),
        }
    }
}

/// Full attributes for one listing, fetched from its own page.
///
/// Costs a page visit per call, so callers fetch these one at a time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ListingDetail {
    pub url: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,

    /// Full condition text from the item page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<String>,
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
