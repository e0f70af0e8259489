//! DCF run pipeline.
//!
//! Projection, then discounting, then terminal value, then resolution.

use super::discount::{present_value, terminal_value};
use super::projection::project_cash_flows;
use super::resolver::{
    enterprise_value, resolve_fair_value, sum_of_present_values, EARNINGS_PROXY_NOTE,
    SHARE_BASE_NOTE,
};
use super::types::*;
use crate::error::Result;

/// Discounted cash flow engine.
#[derive(Debug, Clone, Default)]
pub struct DcfEngine {
    config: EngineConfig,
}

impl DcfEngine {
    /// Create an engine with default config (strict terminal spread).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a full valuation.
    pub fn value(
        &self,
        assumptions: &ValuationAssumptions,
        mode: ValuationMode,
    ) -> Result<ValuationResult> {
        assumptions.validate()?;

        let nominal = project_cash_flows(
            assumptions.base_cash_flow,
            assumptions.growth_rate,
            assumptions.projection_years,
        )?;

        let projected_cash_flows = nominal
            .iter()
            .zip(1u32..)
            .map(|(&nominal_value, year_index)| {
                Ok(ProjectedCashFlow {
                    year_index,
                    nominal_value,
                    present_value: present_value(
                        nominal_value,
                        assumptions.discount_rate,
                        year_index,
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let final_cash_flow = nominal.last().copied().unwrap_or_default();

        let terminal_value_nominal = terminal_value(
            final_cash_flow,
            assumptions.terminal_growth_rate,
            assumptions.discount_rate,
            self.config.terminal_policy,
        )?;
        let terminal_value_present = present_value(
            terminal_value_nominal,
            assumptions.discount_rate,
            assumptions.projection_years,
        )?;

        let sum_of_discounted_cash_flows = sum_of_present_values(&projected_cash_flows);
        let enterprise_value = enterprise_value(&projected_cash_flows, terminal_value_present);

        let estimate = match mode {
            ValuationMode::FairValue => resolve_fair_value(
                enterprise_value,
                final_cash_flow,
                assumptions.ownership_fraction,
                assumptions.expected_price_to_earnings,
            )?,
            ValuationMode::MarketCap => FairValueEstimate::default(),
        };

        let mut notes = Vec::new();
        if estimate.fair_value_per_share.is_some() {
            notes.push(SHARE_BASE_NOTE.to_string());
        }
        if estimate.earnings_multiple_fair_value.is_some() {
            notes.push(EARNINGS_PROXY_NOTE.to_string());
        }
        if self.config.terminal_policy == TerminalPolicy::Unconstrained
            && assumptions.discount_rate <= assumptions.terminal_growth_rate
        {
            notes.push(
                "Terminal growth meets or exceeds the discount rate; the terminal value \
                 is not economically meaningful."
                    .to_string(),
            );
        }

        tracing::debug!(
            mode = %mode,
            years = assumptions.projection_years,
            enterprise_value,
            terminal_value_present,
            fair_value_per_share = ?estimate.fair_value_per_share,
            "DCF valuation complete"
        );

        Ok(ValuationResult {
            mode,
            projected_cash_flows,
            terminal_value_nominal,
            terminal_value_present,
            sum_of_discounted_cash_flows,
            enterprise_value,
            equity_value: enterprise_value,
            estimated_market_cap: enterprise_value,
            implied_share_base: estimate.implied_share_base,
            fair_value_per_share: estimate.fair_value_per_share,
            earnings_multiple_fair_value: estimate.earnings_multiple_fair_value,
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;

    fn make_test_input() -> ValuationAssumptions {
        ValuationAssumptions {
            base_cash_flow: 100.0,
            growth_rate: 0.15,
            discount_rate: 0.10,
            terminal_growth_rate: 0.025,
            projection_years: 5,
            ownership_fraction: Some(0.10),
            expected_price_to_earnings: Some(20.0),
        }
    }

    #[test]
    fn test_reference_valuation() {
        let result = DcfEngine::new()
            .value(&make_test_input(), ValuationMode::FairValue)
            .unwrap();

        assert_eq!(result.projected_cash_flows.len(), 5);
        assert_eq!(result.projected_cash_flows[0].year_index, 1);
        assert_eq!(result.projected_cash_flows[4].year_index, 5);
        assert!((result.sum_of_discounted_cash_flows - 572.4575).abs() < 0.01);
        assert!((result.terminal_value_nominal - 2748.8548).abs() < 0.01);
        assert!((result.terminal_value_present - 1706.8226).abs() < 0.01);
        assert!((result.enterprise_value - 2279.28).abs() < 0.005);
        assert_eq!(result.equity_value, result.enterprise_value);
        assert!((result.fair_value_per_share.unwrap() - 10.0).abs() < 1e-9);
        assert!((result.earnings_multiple_fair_value.unwrap() - 22.94).abs() < 0.01);
        assert_eq!(result.notes.len(), 2);
    }

    #[test]
    fn test_enterprise_value_invariant() {
        let result = DcfEngine::new()
            .value(&make_test_input(), ValuationMode::FairValue)
            .unwrap();
        let reconstructed = result.sum_of_discounted_cash_flows + result.terminal_value_present;
        assert!((result.enterprise_value - reconstructed).abs() < 1e-9);
    }

    #[test]
    fn test_market_cap_mode_has_no_per_share_values() {
        let result = DcfEngine::new()
            .value(&make_test_input(), ValuationMode::MarketCap)
            .unwrap();
        assert!(result.fair_value_per_share.is_none());
        assert!(result.earnings_multiple_fair_value.is_none());
        assert!(result.notes.is_empty());
        assert!(matches!(
            result.require_fair_value(),
            Err(ValuationError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_degenerate_terminal_rejected() {
        let mut input = make_test_input();
        input.discount_rate = 0.08;
        input.terminal_growth_rate = 0.10;
        assert!(matches!(
            DcfEngine::new().value(&input, ValuationMode::FairValue),
            Err(ValuationError::ModelDegenerate(_))
        ));
    }

    #[test]
    fn test_unconstrained_engine_flags_inverted_spread() {
        let engine = DcfEngine::with_config(EngineConfig {
            terminal_policy: TerminalPolicy::Unconstrained,
        });
        let mut input = make_test_input();
        input.discount_rate = 0.08;
        input.terminal_growth_rate = 0.10;

        let result = engine.value(&input, ValuationMode::MarketCap).unwrap();
        assert!(result.terminal_value_nominal < 0.0);
        assert_eq!(result.notes.len(), 1);
    }

    #[test]
    fn test_invalid_assumptions_rejected() {
        let mut input = make_test_input();
        input.discount_rate = 0.0;
        assert!(matches!(
            DcfEngine::new().value(&input, ValuationMode::FairValue),
            Err(ValuationError::InvalidAssumption { .. })
        ));
    }
}
