//! The ranking engine: pure scoring over a batch of listings.
//!
//! Everything here is a function of its inputs and the fixed weight and
//! threshold tables. No state survives a call, so concurrent ranking is
//! safe by construction.

use serde::Serialize;

use crate::error::{RankError, RankResult};
use crate::scoring::weights::WeightTable;
use crate::types::{Condition, Listing, Priority};

/// Default number of recommendations returned.
pub const DEFAULT_TOP_N: usize = 3;

/// Price score given to listings with an unknown price, and to every
/// listing when no price in the batch is known.
const NEUTRAL_PRICE_SCORE: f64 = 0.5;

// Reason thresholds. Fixed policy constants: reasons are derived from the
// computed sub-scores only, never free text.
const BELOW_AVERAGE_PRICE_THRESHOLD: f64 = 0.65;
const ABOVE_AVERAGE_PRICE_THRESHOLD: f64 = 0.35;
const EXCELLENT_CONDITION_THRESHOLD: f64 = 0.85;
const GOOD_CONDITION_THRESHOLD: f64 = 0.7;

/// A listing with its computed scores and justification.
#[derive(Debug, Clone, Serialize)]
pub struct RankedListing {
    /// 1-based position in the recommendation list.
    pub rank: usize,

    pub listing: Listing,

    /// Weighted combination of the three sub-scores, in [0, 1].
    pub total_score: f64,

    pub price_score: f64,
    pub condition_score: f64,
    pub completeness_score: f64,

    /// Short deterministic phrases explaining the high sub-scores.
    pub reasons: Vec<String>,

    /// One-line summary for display.
    pub summary: String,
}

/// Rank a batch of listings and return the top `top_n`.
///
/// An empty batch yields an empty result, not an error. `top_n` larger
/// than the batch is clamped; `top_n == 0` is rejected. Ties on total
/// score keep their input order (the sort is stable).
pub fn rank(
    listings: &[Listing],
    priority: Priority,
    top_n: usize,
    table: &WeightTable,
) -> RankResult<Vec<RankedListing>> {
    if top_n == 0 {
        return Err(RankError::invalid("top_n must be positive"));
    }

    if listings.is_empty() {
        return Ok(Vec::new());
    }

    let weights = table.for_priority(priority);
    let mean_price = mean_known_price(listings);

    let mut scored: Vec<RankedListing> = listings
        .iter()
        .map(|listing| {
            let price_score = price_score(listing.price, mean_price);
            let condition_score = Condition::score_label(listing.condition.as_deref());
            let completeness_score = completeness_score(listing);
            let total_score = weights.combine(price_score, condition_score, completeness_score);

            RankedListing {
                rank: 0,
                listing: listing.clone(),
                total_score,
                price_score,
                condition_score,
                completeness_score,
                reasons: reasons(
                    price_score,
                    condition_score,
                    completeness_score,
                    listing.condition.is_some(),
                ),
                summary: String::new(),
            }
        })
        .collect();

    // Stable sort: equal totals keep input order.
    scored.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(top_n.min(listings.len()));

    for (i, entry) in scored.iter_mut().enumerate() {
        entry.rank = i + 1;
        entry.summary = format!(
            "Ranked #{} - {} at {}",
            entry.rank,
            if entry.listing.title.is_empty() {
                "Unknown"
            } else {
                &entry.listing.title
            },
            entry.listing.price_display()
        );
    }

    Ok(scored)
}

/// Drop sold-out listings, then listings over budget.
///
/// If every listing is sold the sold filter is skipped, matching the
/// behavior of presenting something rather than nothing. The budget filter
/// has no such fallback; over-budget listings are simply gone.
pub fn filter_available(listings: &[Listing], max_budget: Option<u64>) -> Vec<Listing> {
    let mut available: Vec<Listing> = listings.iter().filter(|l| !l.sold_out).cloned().collect();
    if available.is_empty() {
        available = listings.to_vec();
    }

    if let Some(budget) = max_budget {
        available.retain(|l| l.price.map(|p| p <= budget).unwrap_or(true));
    }

    available
}

/// Arithmetic mean over listings with a known price.
fn mean_known_price(listings: &[Listing]) -> Option<f64> {
    let known: Vec<u64> = listings.iter().filter_map(|l| l.price).collect();
    if known.is_empty() {
        return None;
    }
    Some(known.iter().sum::<u64>() as f64 / known.len() as f64)
}

/// Inverse-deviation price score, clamped to [0, 1].
///
/// A listing at the mean scores 0.5; below-average prices score higher,
/// reaching 1.0 at free and 0.0 at twice the mean. Unknown prices, or a
/// batch with no known prices, score the neutral midpoint.
fn price_score(price: Option<u64>, mean_price: Option<f64>) -> f64 {
    match (price, mean_price) {
        (Some(price), Some(mean)) if mean > 0.0 => {
            let deviation = (price as f64 - mean) / mean;
            (0.5 - 0.5 * deviation).clamp(0.0, 1.0)
        }
        _ => NEUTRAL_PRICE_SCORE,
    }
}

/// Fraction of the four expected fields (title, price, url, condition)
/// present and non-empty.
fn completeness_score(listing: &Listing) -> f64 {
    let fields = [
        !listing.title.trim().is_empty(),
        listing.price.is_some(),
        !listing.url.trim().is_empty(),
        listing
            .condition
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false),
    ];
    fields.iter().filter(|&&present| present).count() as f64 / fields.len() as f64
}

/// Justification phrases keyed off the sub-scores via fixed thresholds.
///
/// Condition reasons are only emitted when a condition label was actually
/// present; a neutral score from missing data says nothing about the item.
fn reasons(
    price_score: f64,
    condition_score: f64,
    completeness_score: f64,
    condition_known: bool,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if price_score >= BELOW_AVERAGE_PRICE_THRESHOLD {
        reasons.push("below average price".to_string());
    } else if price_score <= ABOVE_AVERAGE_PRICE_THRESHOLD {
        reasons.push("above average price".to_string());
    }

    if condition_known {
        if condition_score >= EXCELLENT_CONDITION_THRESHOLD {
            reasons.push("excellent condition".to_string());
        } else if condition_score >= GOOD_CONDITION_THRESHOLD {
            reasons.push("good condition".to_string());
        }
    }

    if completeness_score >= 1.0 {
        reasons.push("complete listing information".to_string());
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::listing;

    fn ranked_ids(results: &[RankedListing]) -> Vec<&str> {
        results.iter().map(|r| r.listing.identity()).collect()
    }

    #[test]
    fn empty_batch_yields_empty_result() {
        let results = rank(&[], Priority::Balanced, 3, &WeightTable::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn zero_top_n_is_invalid() {
        let listings = vec![listing("m1", "A", Some(1000), Some("new/unused"))];
        let err = rank(&listings, Priority::Balanced, 0, &WeightTable::default()).unwrap_err();
        assert!(matches!(err, RankError::InvalidArgument { .. }));
    }

    #[test]
    fn top_n_is_clamped_to_batch_size() {
        let listings = vec![
            listing("m1", "A", Some(1000), None),
            listing("m2", "B", Some(2000), None),
            listing("m3", "C", Some(3000), None),
        ];
        let results = rank(&listings, Priority::Balanced, 1000, &WeightTable::default()).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn results_are_sorted_nonincreasing_and_ranked() {
        let listings = vec![
            listing("m1", "A", Some(24800), Some("new/unused")),
            listing("m2", "B", Some(50000), Some("some wear")),
            listing("m3", "C", Some(18500), Some("new/unused")),
        ];
        let results = rank(&listings, Priority::Balanced, 3, &WeightTable::default()).unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].total_score >= pair[1].total_score);
        }
        assert_eq!(
            results.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn balanced_scenario_ranks_cheaper_same_condition_higher() {
        // Mean price 31100. C undercuts A at equal condition; A beats B on
        // both price and condition.
        let listings = vec![
            listing("a", "A", Some(24800), Some("new/unused")),
            listing("b", "B", Some(50000), Some("some wear")),
            listing("c", "C", Some(18500), Some("new/unused")),
        ];
        let results = rank(&listings, Priority::Balanced, 2, &WeightTable::default()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(ranked_ids(&results), vec!["c", "a"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let listings = vec![
            listing("first", "Same", Some(5000), Some("new/unused")),
            listing("second", "Same", Some(5000), Some("new/unused")),
        ];
        let results = rank(&listings, Priority::Balanced, 2, &WeightTable::default()).unwrap();
        assert_eq!(ranked_ids(&results), vec!["first", "second"]);
    }

    #[test]
    fn lowering_a_price_never_lowers_its_price_score() {
        let base = vec![
            listing("m1", "A", Some(30000), None),
            listing("m2", "B", Some(10000), None),
        ];
        let cheaper = vec![
            listing("m1", "A", Some(20000), None),
            listing("m2", "B", Some(10000), None),
        ];

        let score_of = |batch: &[Listing]| {
            let results = rank(batch, Priority::Price, 2, &WeightTable::default()).unwrap();
            results
                .iter()
                .find(|r| r.listing.identity() == "m1")
                .unwrap()
                .price_score
        };

        assert!(score_of(&cheaper) >= score_of(&base));
    }

    #[test]
    fn unknown_prices_degrade_to_neutral() {
        let listings = vec![
            listing("m1", "A", None, Some("new/unused")),
            listing("m2", "B", None, Some("junk")),
        ];
        let results = rank(&listings, Priority::Price, 2, &WeightTable::default()).unwrap();
        for result in &results {
            assert_eq!(result.price_score, NEUTRAL_PRICE_SCORE);
        }
    }

    #[test]
    fn extreme_outlier_price_is_clamped() {
        let listings = vec![
            listing("m1", "A", Some(1000), None),
            listing("m2", "B", Some(10_000_000), None),
        ];
        let results = rank(&listings, Priority::Price, 2, &WeightTable::default()).unwrap();
        for result in &results {
            assert!((0.0..=1.0).contains(&result.price_score));
        }
    }

    #[test]
    fn missing_condition_scores_neutral_not_zero() {
        let listings = vec![
            listing("m1", "A", Some(1000), None),
            listing("m2", "B", Some(1000), Some("junk")),
        ];
        let results = rank(&listings, Priority::Condition, 2, &WeightTable::default()).unwrap();
        let unknown = results
            .iter()
            .find(|r| r.listing.identity() == "m1")
            .unwrap();
        let junk = results
            .iter()
            .find(|r| r.listing.identity() == "m2")
            .unwrap();
        assert!(unknown.condition_score > junk.condition_score);
    }

    #[test]
    fn ranking_is_idempotent() {
        let listings = vec![
            listing("m1", "A", Some(24800), Some("new/unused")),
            listing("m2", "B", Some(50000), Some("some wear")),
            listing("m3", "C", Some(18500), None),
        ];
        let first = rank(&listings, Priority::Balanced, 3, &WeightTable::default()).unwrap();
        let second = rank(&listings, Priority::Balanced, 3, &WeightTable::default()).unwrap();
        assert_eq!(ranked_ids(&first), ranked_ids(&second));
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.total_score, b.total_score);
            assert_eq!(a.reasons, b.reasons);
        }
    }

    #[test]
    fn reasons_come_from_fixed_thresholds() {
        let listings = vec![
            listing("cheap", "A", Some(1000), Some("new/unused")),
            listing("dear", "B", Some(99000), Some("junk")),
        ];
        let results = rank(&listings, Priority::Balanced, 2, &WeightTable::default()).unwrap();

        let cheap = &results[0];
        assert_eq!(cheap.listing.identity(), "cheap");
        assert!(cheap.reasons.contains(&"below average price".to_string()));
        assert!(cheap.reasons.contains(&"excellent condition".to_string()));
        assert!(cheap
            .reasons
            .contains(&"complete listing information".to_string()));

        let dear = &results[1];
        assert!(dear.reasons.contains(&"above average price".to_string()));
        // Junk condition scores below every condition threshold.
        assert!(!dear.reasons.contains(&"excellent condition".to_string()));
        assert!(!dear.reasons.contains(&"good condition".to_string()));
    }

    #[test]
    fn condition_reasons_respect_mid_vocabulary() {
        // Equal prices keep the price reasons out of the way.
        let listings = vec![
            listing("near_new", "A", Some(5000), Some("no noticeable wear")),
            listing("mid", "B", Some(5000), Some("some wear")),
        ];
        let results = rank(&listings, Priority::Balanced, 2, &WeightTable::default()).unwrap();

        let near_new = results
            .iter()
            .find(|r| r.listing.identity() == "near_new")
            .unwrap();
        assert!(near_new.reasons.contains(&"good condition".to_string()));
        assert!(!near_new
            .reasons
            .contains(&"excellent condition".to_string()));

        // The vocabulary midpoint earns no condition praise.
        let mid = results
            .iter()
            .find(|r| r.listing.identity() == "mid")
            .unwrap();
        assert!(!mid.reasons.contains(&"excellent condition".to_string()));
        assert!(!mid.reasons.contains(&"good condition".to_string()));
    }

    #[test]
    fn no_condition_reason_for_missing_label() {
        let listings = vec![listing("m1", "A", Some(1000), None)];
        let results = rank(&listings, Priority::Balanced, 1, &WeightTable::default()).unwrap();
        assert!(!results[0]
            .reasons
            .iter()
            .any(|r| r == "excellent condition" || r == "good condition"));
    }

    #[test]
    fn incomplete_listing_scores_lower_completeness() {
        let complete = listing("m1", "A", Some(1000), Some("new/unused"));
        let mut partial = listing("m2", "", None, None);
        partial.condition = None;

        let results = rank(
            &[complete, partial],
            Priority::Balanced,
            2,
            &WeightTable::default(),
        )
        .unwrap();
        let complete_score = results
            .iter()
            .find(|r| r.listing.identity() == "m1")
            .unwrap()
            .completeness_score;
        let partial_score = results
            .iter()
            .find(|r| r.listing.identity() == "m2")
            .unwrap()
            .completeness_score;
        assert_eq!(complete_score, 1.0);
        assert_eq!(partial_score, 0.25); // only the url is present
    }

    #[test]
    fn sold_out_listings_are_filtered_with_fallback() {
        let mut sold = listing("m1", "A", Some(1000), None);
        sold.sold_out = true;
        let open = listing("m2", "B", Some(2000), None);

        let available = filter_available(&[sold.clone(), open.clone()], None);
        assert_eq!(available, vec![open]);

        // All sold: fall back to the full batch.
        let all_sold = filter_available(&[sold.clone()], None);
        assert_eq!(all_sold, vec![sold]);
    }

    #[test]
    fn budget_filter_drops_expensive_keeps_unknown() {
        let cheap = listing("m1", "A", Some(1000), None);
        let pricey = listing("m2", "B", Some(90000), None);
        let unknown = listing("m3", "C", None, None);

        let available = filter_available(&[cheap.clone(), pricey, unknown.clone()], Some(5000));
        assert_eq!(available, vec![cheap, unknown]);
    }
}
