//! Discounting and terminal value estimation.

use super::types::TerminalPolicy;
use crate::error::{Result, ValuationError};

/// Present value of `nominal` received at the end of year `year_index`.
pub fn present_value(nominal: f64, discount_rate: f64, year_index: u32) -> Result<f64> {
    if !discount_rate.is_finite() || discount_rate <= -1.0 {
        return Err(ValuationError::invalid("discount_rate", "must be > -1"));
    }
    if year_index < 1 {
        return Err(ValuationError::invalid("year_index", "must be at least 1"));
    }

    let exponent = i32::try_from(year_index)
        .map_err(|_| ValuationError::invalid("year_index", "out of range"))?;
    let pv = nominal / (1.0 + discount_rate).powi(exponent);
    if !pv.is_finite() {
        return Err(ValuationError::invalid(
            "discount_rate",
            "discount factor underflows",
        ));
    }
    Ok(pv)
}

/// Gordon Growth perpetuity value of the cash flows after the final year.
///
/// `TV = final * (1 + g) / (r - g)`. Under [`TerminalPolicy::Strict`] the
/// spread `r - g` must be at least `epsilon`; a thinner or inverted spread is
/// `ModelDegenerate`. The unconstrained policy returns negative values for
/// inverted spreads but still refuses a zero spread.
pub fn terminal_value(
    final_cash_flow: f64,
    terminal_growth_rate: f64,
    discount_rate: f64,
    policy: TerminalPolicy,
) -> Result<f64> {
    let spread = discount_rate - terminal_growth_rate;

    if let TerminalPolicy::Strict { epsilon } = policy {
        if spread.is_nan() || spread < epsilon {
            tracing::warn!(
                discount_rate,
                terminal_growth_rate,
                epsilon,
                "Rejecting terminal value with non-positive spread"
            );
            return Err(ValuationError::ModelDegenerate(format!(
                "discount rate ({discount_rate}) must exceed terminal growth rate \
                 ({terminal_growth_rate}) by at least {epsilon}"
            )));
        }
    }

    let tv = final_cash_flow * (1.0 + terminal_growth_rate) / spread;
    if !tv.is_finite() {
        return Err(ValuationError::ModelDegenerate(format!(
            "terminal value is not finite (spread {spread})"
        )));
    }
    Ok(tv)
}
