//! Fair-value resolution.
//!
//! There is no share-count input. Instead an implied share base is derived
//! from the ownership fraction (`enterprise_value * ownership_fraction`), and
//! earnings are approximated by marking up the final-year cash flow by
//! [`EARNINGS_PROXY_MARKUP`]. Both figures are heuristics and every result
//! that uses them says so in its notes.

use super::types::{FairValueEstimate, ProjectedCashFlow, EARNINGS_PROXY_MARKUP};
use crate::error::{Result, ValuationError};

pub const SHARE_BASE_NOTE: &str = "Per-share values use an implied share base derived from the \
     ownership fraction, not a reported share count; treat them as approximations.";

pub const EARNINGS_PROXY_NOTE: &str = "The P/E fair value uses final-year cash flow x 1.3 as an \
     earnings proxy, not reported earnings.";

/// Sum of discounted projected cash flows.
pub fn sum_of_present_values(flows: &[ProjectedCashFlow]) -> f64 {
    flows.iter().map(|cf| cf.present_value).sum()
}

/// Enterprise value from discounted flows and the discounted terminal value.
pub fn enterprise_value(flows: &[ProjectedCashFlow], terminal_value_present: f64) -> f64 {
    sum_of_present_values(flows) + terminal_value_present
}

/// Resolve per-share estimates.
///
/// With no ownership fraction (absent or zero) the estimate is empty rather
/// than zero. A P/E multiple alone does not produce a value; it needs the
/// same share base.
pub fn resolve_fair_value(
    enterprise_value: f64,
    final_cash_flow: f64,
    ownership_fraction: Option<f64>,
    expected_price_to_earnings: Option<f64>,
) -> Result<FairValueEstimate> {
    let fraction = match ownership_fraction {
        Some(f) if f > 0.0 => f,
        _ => return Ok(FairValueEstimate::default()),
    };

    let share_base = enterprise_value * fraction;
    if share_base == 0.0 || !share_base.is_finite() {
        return Err(ValuationError::DivisionByZero(format!(
            "implied share base is {share_base} (enterprise value {enterprise_value}, \
             ownership fraction {fraction})"
        )));
    }

    let fair_value_per_share = enterprise_value / share_base;

    let earnings_multiple_fair_value = expected_price_to_earnings
        .filter(|pe| *pe > 0.0)
        .map(|pe| final_cash_flow * EARNINGS_PROXY_MARKUP * pe / share_base);

    Ok(FairValueEstimate {
        implied_share_base: Some(share_base),
        fair_value_per_share: Some(fair_value_per_share),
        earnings_multiple_fair_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EV: f64 = 2279.280_075_4;
    const FINAL_CF: f64 = 201.135_718_75;

    #[test]
    fn test_enterprise_value_sums_components() {
        let flows = vec![
            ProjectedCashFlow {
                year_index: 1,
                nominal_value: 110.0,
                present_value: 100.0,
            },
            ProjectedCashFlow {
                year_index: 2,
                nominal_value: 121.0,
                present_value: 100.0,
            },
        ];
        assert_eq!(sum_of_present_values(&flows), 200.0);
        assert_eq!(enterprise_value(&flows, 50.0), 250.0);
    }

    #[test]
    fn test_share_base_is_enterprise_value_times_ownership() {
        let estimate = resolve_fair_value(EV, FINAL_CF, Some(0.10), None).unwrap();
        assert!((estimate.implied_share_base.unwrap() - 227.928).abs() < 1e-3);
        assert!((estimate.fair_value_per_share.unwrap() - 10.0).abs() < 1e-9);
        assert!(estimate.earnings_multiple_fair_value.is_none());

        // fair value per share is 1 / ownership, independent of EV
        let estimate = resolve_fair_value(EV * 3.0, FINAL_CF, Some(0.25), None).unwrap();
        assert!((estimate.implied_share_base.unwrap() - EV * 0.75).abs() < 1e-6);
        assert!((estimate.fair_value_per_share.unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_earnings_multiple_fair_value() {
        let estimate = resolve_fair_value(EV, FINAL_CF, Some(0.10), Some(20.0)).unwrap();
        let expected = FINAL_CF * 1.3 * 20.0 / (EV * 0.10);
        assert!((estimate.earnings_multiple_fair_value.unwrap() - expected).abs() < 1e-9);
        assert!((expected - 22.943_774).abs() < 1e-5);
    }

    #[test]
    fn test_absent_or_zero_ownership_omits_values() {
        for fraction in [None, Some(0.0)] {
            let estimate = resolve_fair_value(EV, FINAL_CF, fraction, Some(20.0)).unwrap();
            assert_eq!(estimate, FairValueEstimate::default());
        }
    }

    #[test]
    fn test_zero_enterprise_value_is_division_by_zero() {
        let err = resolve_fair_value(0.0, 0.0, Some(0.1), None).unwrap_err();
        assert!(matches!(err, ValuationError::DivisionByZero(_)));
    }
}
