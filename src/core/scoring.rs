use chrono::NaiveDate;

use crate::core::normalize::{currencies_match, destinations_match};
use crate::models::{Extraction, Package, ScoringWeights};

/// Package duration may differ from the requested trip length by this many
/// days and still count as a fit.
const DURATION_TOLERANCE_DAYS: i64 = 1;

/// Reason strings, in criterion evaluation order. The order is part of the
/// contract: repeated runs over identical inputs must produce identical
/// reason lists.
pub const REASON_DESTINATION: &str = "Destination matches";
pub const REASON_BUDGET: &str = "Within budget";
pub const REASON_DURATION: &str = "Duration fits";
pub const REASON_DATES: &str = "Dates available";

/// Score a package against an extraction (0-100)
///
/// Each criterion contributes either 0 or its full weight, and only when
/// the corresponding extraction field is present and evaluable. An absent
/// field skips its criterion silently; a present-but-failing field scores
/// 0 on it. Criteria run in a fixed order (destination, budget, duration,
/// dates) and append their reason strings in that order.
///
/// # Returns
/// Total score clamped to 100, and the ordered reason list
pub fn calculate_match_score(
    package: &Package,
    extraction: &Extraction,
    weights: &ScoringWeights,
) -> (u32, Vec<String>) {
    let mut score: u32 = 0;
    let mut reasons = Vec::new();

    // Criterion 1: destination
    if let Some(wanted) = extraction.destination.as_deref() {
        if destinations_match(&package.destination, wanted) {
            score += weights.destination;
            reasons.push(REASON_DESTINATION.to_string());
        }
    }

    // Criterion 2: budget
    if let Some(budget) = &extraction.budget {
        if budget_fits(package.price, &package.currency, budget.amount, &budget.currency) {
            score += weights.budget;
            reasons.push(REASON_BUDGET.to_string());
        }
    }

    // Criterion 3: duration
    if let Some(requested_days) = extraction.effective_duration_days() {
        if duration_fits(package.duration_days, requested_days) {
            score += weights.duration;
            reasons.push(REASON_DURATION.to_string());
        }
    }

    // Criterion 4: date availability
    if let (Some(start), Some(end)) = (extraction.start_date, extraction.end_date) {
        if let Some(true) = dates_overlap(
            package.available_from,
            package.available_to,
            start,
            end,
        ) {
            score += weights.dates;
            reasons.push(REASON_DATES.to_string());
        }
    }

    (score.min(100), reasons)
}

/// A package fits the budget when it is priced at or under the requested
/// amount in the same currency. Different currencies never fit; there is
/// no conversion table here.
#[inline]
pub fn budget_fits(price: f64, price_currency: &str, budget: f64, budget_currency: &str) -> bool {
    currencies_match(price_currency, budget_currency) && price <= budget
}

/// Package duration within ±1 day of the requested trip length
#[inline]
pub fn duration_fits(package_days: i32, requested_days: i64) -> bool {
    (package_days as i64 - requested_days).abs() <= DURATION_TOLERANCE_DAYS
}

/// Check whether a package's availability window overlaps the requested
/// date range
///
/// Returns `None` when the package tracks no window at all (criterion not
/// evaluable), otherwise whether the ranges overlap. A missing bound on
/// one side of the window is treated as open-ended.
#[inline]
pub fn dates_overlap(
    available_from: Option<NaiveDate>,
    available_to: Option<NaiveDate>,
    start: NaiveDate,
    end: NaiveDate,
) -> Option<bool> {
    if available_from.is_none() && available_to.is_none() {
        return None;
    }

    let starts_in_time = available_from.map_or(true, |from| from <= end);
    let ends_in_time = available_to.map_or(true, |to| to >= start);

    Some(starts_in_time && ends_in_time)
}
