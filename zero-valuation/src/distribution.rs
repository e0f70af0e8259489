//! Valuation distribution for charting.
//!
//! A presentation heuristic: 21 price points from -50% to +50% of fair value
//! weighted by `exp(-3 d^2)` with `d = |offset| / 50`, scaled by 0.3 and
//! skewed by investor category. Weights are relative and do not sum to 1.

use serde::{Deserialize, Serialize};
use zero_common::util::round_to;

use crate::error::{Result, ValuationError};
use crate::profile::InvestorCategory;

/// Offset range and step, in percent of fair value.
pub const OFFSET_MIN_PCT: i32 = -50;
pub const OFFSET_MAX_PCT: i32 = 50;
pub const OFFSET_STEP_PCT: usize = 5;

/// Number of points in every distribution.
pub const POINT_COUNT: usize = 21;

const KERNEL_SHARPNESS: f64 = 3.0;
const PROBABILITY_SCALE: f64 = 0.3;
const FAVOURED_SKEW: f64 = 1.2;
const DISFAVOURED_SKEW: f64 = 0.8;

/// One histogram bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionPoint {
    pub offset_percent: i32,
    /// Rounded to cents
    pub price: f64,
    /// Relative weight, not a normalized density
    pub probability: f64,
}

/// Distribution around a fair value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationDistribution {
    pub fair_value: f64,
    pub current_price: f64,
    pub category: InvestorCategory,
    /// Where the current price sits relative to fair value, for a chart marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price_offset_percent: Option<f64>,
    pub points: Vec<DistributionPoint>,
}

/// Skew multiplier for an offset. The centre bar counts as the disfavoured
/// side for both skewed categories.
fn skew(category: InvestorCategory, offset: i32) -> f64 {
    match category {
        InvestorCategory::Aggressive if offset > 0 => FAVOURED_SKEW,
        InvestorCategory::Conservative if offset < 0 => FAVOURED_SKEW,
        InvestorCategory::Aggressive | InvestorCategory::Conservative => DISFAVOURED_SKEW,
        InvestorCategory::Moderate => 1.0,
    }
}

/// Relative weight at an offset (percent of fair value).
pub fn probability_at(offset_percent: i32, category: InvestorCategory) -> f64 {
    let d = f64::from(offset_percent.abs()) / f64::from(OFFSET_MAX_PCT);
    (-KERNEL_SHARPNESS * d * d).exp() * skew(category, offset_percent) * PROBABILITY_SCALE
}

/// Generate the distribution.
pub fn generate_distribution(
    fair_value: f64,
    current_price: f64,
    category: InvestorCategory,
) -> Result<ValuationDistribution> {
    if !fair_value.is_finite() {
        return Err(ValuationError::invalid("fair_value", "must be finite"));
    }
    if !current_price.is_finite() || current_price < 0.0 {
        return Err(ValuationError::invalid(
            "current_price",
            "must be a finite number >= 0",
        ));
    }

    let points: Vec<DistributionPoint> = (OFFSET_MIN_PCT..=OFFSET_MAX_PCT)
        .step_by(OFFSET_STEP_PCT)
        .map(|offset| DistributionPoint {
            offset_percent: offset,
            price: round_to(fair_value * (1.0 + f64::from(offset) / 100.0), 2),
            probability: probability_at(offset, category),
        })
        .collect();

    let current_price_offset_percent =
        (fair_value != 0.0).then(|| (current_price - fair_value) / fair_value * 100.0);

    Ok(ValuationDistribution {
        fair_value,
        current_price,
        category,
        current_price_offset_percent,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prob_at(dist: &ValuationDistribution, offset: i32) -> f64 {
        dist.points
            .iter()
            .find(|p| p.offset_percent == offset)
            .map(|p| p.probability)
            .unwrap()
    }

    #[test]
    fn test_always_twenty_one_points() {
        for fv in [0.0, 0.37, 100.0, 1.0e12] {
            let dist = generate_distribution(fv, 10.0, InvestorCategory::Moderate).unwrap();
            assert_eq!(dist.points.len(), POINT_COUNT);
            assert!(dist.points.iter().all(|p| p.probability >= 0.0));
        }
    }

    #[test]
    fn test_prices_span_half_to_one_and_a_half() {
        let dist = generate_distribution(100.0, 90.0, InvestorCategory::Moderate).unwrap();
        assert_eq!(dist.points[0].price, 50.0);
        assert_eq!(dist.points[10].price, 100.0);
        assert_eq!(dist.points[20].price, 150.0);
        assert_eq!(dist.points[1].offset_percent, -45);
        assert_eq!(dist.current_price_offset_percent, Some(-10.0));
    }

    #[test]
    fn test_moderate_kernel_values() {
        let dist = generate_distribution(100.0, 100.0, InvestorCategory::Moderate).unwrap();
        assert!((prob_at(&dist, 0) - 0.3).abs() < 1e-12);
        assert!((prob_at(&dist, -50) - 0.3 * (-3.0f64).exp()).abs() < 1e-12);
        assert!((prob_at(&dist, 50) - 0.014_936).abs() < 1e-6);
        assert_eq!(prob_at(&dist, -25), prob_at(&dist, 25));
    }

    #[test]
    fn test_aggressive_skews_upside() {
        let dist = generate_distribution(100.0, 100.0, InvestorCategory::Aggressive).unwrap();
        assert!((prob_at(&dist, 0) - 0.24).abs() < 1e-12);
        assert!((prob_at(&dist, 50) - 0.017_923).abs() < 1e-6);
        assert!((prob_at(&dist, -50) - 0.011_949).abs() < 1e-6);
        assert!(prob_at(&dist, 25) > prob_at(&dist, -25));
    }

    #[test]
    fn test_conservative_mirrors_aggressive() {
        let aggressive = generate_distribution(100.0, 80.0, InvestorCategory::Aggressive).unwrap();
        let conservative =
            generate_distribution(100.0, 80.0, InvestorCategory::Conservative).unwrap();
        for offset in (-50..=50).step_by(5) {
            assert_eq!(prob_at(&aggressive, offset), prob_at(&conservative, -offset));
        }
    }

    #[test]
    fn test_small_fair_value_keeps_distinct_prices() {
        let dist = generate_distribution(0.4, 0.4, InvestorCategory::Moderate).unwrap();
        assert_eq!(dist.points[0].price, 0.2);
        assert_eq!(dist.points[20].price, 0.6);
    }

    #[test]
    fn test_zero_fair_value_has_no_marker() {
        let dist = generate_distribution(0.0, 10.0, InvestorCategory::Moderate).unwrap();
        assert!(dist.current_price_offset_percent.is_none());
    }

    #[test]
    fn test_rejects_non_finite_inputs() {
        assert!(generate_distribution(f64::INFINITY, 1.0, InvestorCategory::Moderate).is_err());
        assert!(generate_distribution(1.0, f64::NAN, InvestorCategory::Moderate).is_err());
    }
}
