//! Cash-flow projection.

use super::types::MAX_PROJECTION_YEARS;
use crate::error::{Result, ValuationError};

/// Compound `base` forward for `years` years at a constant `growth_rate`.
///
/// Returns `years` nominal flows where `flow[i-1] = base * (1 + g)^i` for
/// `i = 1..=years`. The base itself is never emitted as year 0.
pub fn project_cash_flows(base: f64, growth_rate: f64, years: u32) -> Result<Vec<f64>> {
    if !(1..=MAX_PROJECTION_YEARS).contains(&years) {
        return Err(ValuationError::invalid(
            "projection_years",
            format!("must be between 1 and {MAX_PROJECTION_YEARS}"),
        ));
    }
    if !growth_rate.is_finite() || growth_rate < -1.0 {
        return Err(ValuationError::invalid("growth_rate", "must be >= -1"));
    }
    if !base.is_finite() {
        return Err(ValuationError::invalid("base_cash_flow", "must be finite"));
    }

    let factor = 1.0 + growth_rate;
    let flows = (1..=years)
        .map(|year| -> Result<f64> {
            let exponent = i32::try_from(year)
                .map_err(|_| ValuationError::invalid("projection_years", "out of range"))?;
            Ok(base * factor.powi(exponent))
        })
        .collect::<Result<Vec<f64>>>()?;

    if flows.iter().any(|f| !f.is_finite()) {
        return Err(ValuationError::invalid(
            "growth_rate",
            "compounds beyond representable range",
        ));
    }

    Ok(flows)
}
