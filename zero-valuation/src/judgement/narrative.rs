//! Conclusion and recommendation templates.
//!
//! Wording is presentational; only the classification fields are load-bearing.

use super::types::ValuationStatus;
use crate::profile::InvestorCategory;

/// Ticker used when the caller supplies none.
pub const DEFAULT_TICKER: &str = "CUSTOM";

/// Fields a template may reference.
pub struct NarrativeContext<'a> {
    pub ticker: &'a str,
    pub fair_value: f64,
    pub current_price: f64,
    pub upside_percent: f64,
    pub margin_of_safety_percent: f64,
    pub required_margin_of_safety: f64,
    pub category: InvestorCategory,
}

/// Build `(narrative, recommendation)` for a status.
pub fn render(
    status: ValuationStatus,
    meets_criteria: bool,
    ctx: &NarrativeContext<'_>,
) -> (String, String) {
    let NarrativeContext {
        ticker,
        fair_value,
        current_price,
        upside_percent,
        margin_of_safety_percent: mos,
        required_margin_of_safety,
        category,
    } = *ctx;

    match status {
        ValuationStatus::Undervalued if meets_criteria => (
            format!(
                "{ticker} appears undervalued with a {mos:.1}% margin of safety. At the current \
                 price of ${current_price:.2}, the stock trades below our fair value estimate of \
                 ${fair_value:.2}."
            ),
            format!(
                "This investment opportunity meets the criteria for a {category} investor, \
                 offering sufficient margin of safety and potential upside."
            ),
        ),
        ValuationStatus::Undervalued => (
            format!(
                "{ticker} shows potential value at current levels, but the {mos:.1}% margin of \
                 safety is below the {required_margin_of_safety}% threshold preferred by \
                 {category} investors."
            ),
            "Consider waiting for a better entry point or adjusting position size to account \
             for the lower margin of safety."
                .to_string(),
        ),
        ValuationStatus::Overvalued => (
            format!(
                "At ${current_price:.2}, {ticker} trades above our estimated fair value of \
                 ${fair_value:.2}, representing a {:.1}% premium.",
                upside_percent.abs()
            ),
            format!(
                "This valuation does not meet the return expectations of a {category} investor. \
                 Consider monitoring for a better entry opportunity."
            ),
        ),
        ValuationStatus::FairlyValued => (
            format!(
                "{ticker} appears fairly valued at current levels. The stock trades near our \
                 estimated fair value of ${fair_value:.2}."
            ),
            if category == InvestorCategory::Aggressive {
                "Aggressive investors may still find opportunity in the growth potential if \
                 fundamentals remain strong."
                    .to_string()
            } else {
                "Consider adding to watchlist and waiting for a more attractive entry point."
                    .to_string()
            },
        ),
    }
}
