//! DCF data model.
//!
//! All rates are fractional (`0.15` = 15%). Percent-to-fraction conversion
//! happens at the HTTP boundary in [`crate::input`], never here.

use serde::{Deserialize, Serialize};
use zero_common::config::ValuationSettings;

use crate::error::{Result, ValuationError};

/// Markup applied to the final-year cash flow to stand in for earnings
/// when computing the P/E-based fair value.
pub const EARNINGS_PROXY_MARKUP: f64 = 1.3;

/// Default minimum gap between discount rate and terminal growth rate.
pub const DEFAULT_TERMINAL_SPREAD_EPSILON: f64 = 0.0001;

/// Longest explicit projection horizon accepted, in years.
pub const MAX_PROJECTION_YEARS: u32 = 100;

// ============================================================================
// Inputs
// ============================================================================

/// Modeling assumptions for a single valuation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationAssumptions {
    /// Starting free cash flow (or earnings)
    pub base_cash_flow: f64,
    /// Annual growth rate over the projection horizon
    pub growth_rate: f64,
    /// Cost of capital
    pub discount_rate: f64,
    /// Perpetual growth rate after the horizon
    pub terminal_growth_rate: f64,
    /// Number of explicitly projected years
    pub projection_years: u32,
    /// Fraction of the enterprise held per unit, drives the implied share base
    #[serde(default)]
    pub ownership_fraction: Option<f64>,
    /// Expected price-to-earnings multiple
    #[serde(default)]
    pub expected_price_to_earnings: Option<f64>,
}

impl ValuationAssumptions {
    /// Check every field against its domain.
    pub fn validate(&self) -> Result<()> {
        if !self.base_cash_flow.is_finite() || self.base_cash_flow < 0.0 {
            return Err(ValuationError::invalid(
                "base_cash_flow",
                "must be a finite number >= 0",
            ));
        }
        if !self.growth_rate.is_finite() || self.growth_rate < -1.0 {
            return Err(ValuationError::invalid("growth_rate", "must be >= -1"));
        }
        if !self.discount_rate.is_finite() || self.discount_rate <= 0.0 {
            return Err(ValuationError::invalid("discount_rate", "must be > 0"));
        }
        if !self.terminal_growth_rate.is_finite() || self.terminal_growth_rate <= -1.0 {
            return Err(ValuationError::invalid(
                "terminal_growth_rate",
                "must be > -1",
            ));
        }
        if !(1..=MAX_PROJECTION_YEARS).contains(&self.projection_years) {
            return Err(ValuationError::invalid(
                "projection_years",
                format!("must be between 1 and {MAX_PROJECTION_YEARS}"),
            ));
        }
        if let Some(fraction) = self.ownership_fraction {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(ValuationError::invalid(
                    "ownership_fraction",
                    "must be between 0 and 1",
                ));
            }
        }
        if let Some(pe) = self.expected_price_to_earnings {
            if !pe.is_finite() || pe <= 0.0 {
                return Err(ValuationError::invalid(
                    "expected_price_to_earnings",
                    "must be > 0",
                ));
            }
        }
        Ok(())
    }
}

/// What the caller wants out of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMode {
    /// Enterprise and equity value only
    MarketCap,
    /// Enterprise value plus per-share estimates
    #[default]
    FairValue,
}

impl std::fmt::Display for ValuationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MarketCap => write!(f, "market_cap"),
            Self::FairValue => write!(f, "fair_value"),
        }
    }
}

/// How the terminal value estimator treats a thin or inverted spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerminalPolicy {
    /// Require `discount - terminal_growth >= epsilon`
    Strict { epsilon: f64 },
    /// Exploratory: accept any spread that yields a finite value
    Unconstrained,
}

impl Default for TerminalPolicy {
    fn default() -> Self {
        Self::Strict {
            epsilon: DEFAULT_TERMINAL_SPREAD_EPSILON,
        }
    }
}

// ============================================================================
// Outputs
// ============================================================================

/// One projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedCashFlow {
    pub year_index: u32,
    pub nominal_value: f64,
    pub present_value: f64,
}

/// Per-share estimates derived from enterprise value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairValueEstimate {
    pub implied_share_base: Option<f64>,
    pub fair_value_per_share: Option<f64>,
    pub earnings_multiple_fair_value: Option<f64>,
}

/// Output of a valuation run.
///
/// `enterprise_value == sum_of_discounted_cash_flows + terminal_value_present`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub mode: ValuationMode,
    pub projected_cash_flows: Vec<ProjectedCashFlow>,
    pub terminal_value_nominal: f64,
    pub terminal_value_present: f64,
    pub sum_of_discounted_cash_flows: f64,
    pub enterprise_value: f64,
    /// Reported equal to enterprise value; no net-debt adjustment is made
    pub equity_value: f64,
    pub estimated_market_cap: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implied_share_base: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fair_value_per_share: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earnings_multiple_fair_value: Option<f64>,
    /// Caveats about heuristic figures in this result
    pub notes: Vec<String>,
}

impl ValuationResult {
    /// Final projected nominal cash flow.
    pub fn final_cash_flow(&self) -> Option<f64> {
        self.projected_cash_flows.last().map(|cf| cf.nominal_value)
    }

    /// Fair value per share, or `DivisionByZero` when no share base exists.
    pub fn require_fair_value(&self) -> Result<f64> {
        self.fair_value_per_share.ok_or_else(|| {
            ValuationError::DivisionByZero(
                "fair value per share requested but implied share base is zero \
                 (ownership fraction is 0 or absent, or mode is market_cap)"
                    .into(),
            )
        })
    }
}

// ============================================================================
// Engine Configuration
// ============================================================================

/// DCF engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub terminal_policy: TerminalPolicy,
}

impl EngineConfig {
    /// Build from the `valuation` config section.
    pub fn from_settings(settings: &ValuationSettings) -> Self {
        let terminal_policy = if settings.allow_unconstrained_terminal.unwrap_or(false) {
            TerminalPolicy::Unconstrained
        } else {
            TerminalPolicy::Strict {
                epsilon: settings
                    .terminal_spread_epsilon
                    .unwrap_or(DEFAULT_TERMINAL_SPREAD_EPSILON),
            }
        };
        Self { terminal_policy }
    }
}
