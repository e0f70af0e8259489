//! Valuation judgement analyzer.
//!
//! Compares a fair value to the current price and checks the result against
//! the margin of safety an investor category requires.

use zero_common::config::ValuationSettings;

use super::narrative::{self, NarrativeContext};
use super::types::*;
use crate::error::{Result, ValuationError};
use crate::profile::InvestorCategory;

/// Judgement analyzer configuration.
#[derive(Debug, Clone)]
pub struct JudgementConfig {
    /// Upside (%) above which a price is undervalued (exclusive)
    pub undervalued_upside_pct: f64,
    /// Upside (%) below which a price is overvalued (exclusive)
    pub overvalued_upside_pct: f64,
    /// Minimum margin of safety (%) for conservative investors
    pub conservative_min_mos: f64,
    /// Minimum margin of safety (%) for moderate investors
    pub moderate_min_mos: f64,
    /// Minimum margin of safety (%) for aggressive investors
    pub aggressive_min_mos: f64,
}

impl Default for JudgementConfig {
    fn default() -> Self {
        Self {
            undervalued_upside_pct: 15.0,
            overvalued_upside_pct: -10.0,
            conservative_min_mos: InvestorCategory::Conservative.default_min_margin_of_safety(),
            moderate_min_mos: InvestorCategory::Moderate.default_min_margin_of_safety(),
            aggressive_min_mos: InvestorCategory::Aggressive.default_min_margin_of_safety(),
        }
    }
}

impl JudgementConfig {
    /// Build from the `valuation` config section, keeping defaults for unset fields.
    pub fn from_settings(settings: &ValuationSettings) -> Self {
        let d = Self::default();
        let mos = &settings.margin_of_safety;
        Self {
            undervalued_upside_pct: settings
                .undervalued_upside_pct
                .unwrap_or(d.undervalued_upside_pct),
            overvalued_upside_pct: settings
                .overvalued_upside_pct
                .unwrap_or(d.overvalued_upside_pct),
            conservative_min_mos: mos.conservative.unwrap_or(d.conservative_min_mos),
            moderate_min_mos: mos.moderate.unwrap_or(d.moderate_min_mos),
            aggressive_min_mos: mos.aggressive.unwrap_or(d.aggressive_min_mos),
        }
    }

    /// Minimum margin of safety for a category.
    pub fn min_margin_of_safety(&self, category: InvestorCategory) -> f64 {
        match category {
            InvestorCategory::Conservative => self.conservative_min_mos,
            InvestorCategory::Moderate => self.moderate_min_mos,
            InvestorCategory::Aggressive => self.aggressive_min_mos,
        }
    }
}

/// Upside of fair value over current price, in percent.
pub fn upside_percent(fair_value: f64, current_price: f64) -> Result<f64> {
    if !current_price.is_finite() || current_price < 0.0 {
        return Err(ValuationError::invalid(
            "current_price",
            "must be a finite number > 0",
        ));
    }
    if current_price == 0.0 {
        return Err(ValuationError::DivisionByZero(
            "current price is zero".into(),
        ));
    }
    Ok((fair_value - current_price) / current_price * 100.0)
}

/// Margin of safety of the current price below fair value, in percent.
pub fn margin_of_safety_percent(fair_value: f64, current_price: f64) -> Result<f64> {
    if fair_value == 0.0 {
        return Err(ValuationError::DivisionByZero("fair value is zero".into()));
    }
    Ok((fair_value - current_price) / fair_value * 100.0)
}

/// Valuation judgement analyzer.
#[derive(Debug, Clone, Default)]
pub struct JudgementAnalyzer {
    config: JudgementConfig,
}

impl JudgementAnalyzer {
    /// Create a new analyzer with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config.
    pub fn with_config(config: JudgementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JudgementConfig {
        &self.config
    }

    /// Status for an upside. Both thresholds are exclusive, so an upside of
    /// exactly -10 is fairly valued.
    pub fn classify_status(&self, upside: f64) -> ValuationStatus {
        if upside > self.config.undervalued_upside_pct {
            ValuationStatus::Undervalued
        } else if upside < self.config.overvalued_upside_pct {
            ValuationStatus::Overvalued
        } else {
            ValuationStatus::FairlyValued
        }
    }

    /// Judge a fair value against the current price for an investor category.
    pub fn judge(
        &self,
        fair_value: f64,
        current_price: f64,
        category: InvestorCategory,
        ticker: Option<&str>,
    ) -> Result<ValuationJudgement> {
        if !fair_value.is_finite() {
            return Err(ValuationError::invalid("fair_value", "must be finite"));
        }

        let upside = upside_percent(fair_value, current_price)?;
        let mos = margin_of_safety_percent(fair_value, current_price)?;
        let status = self.classify_status(upside);
        let required = self.config.min_margin_of_safety(category);
        let meets_profile_criteria = status == ValuationStatus::Undervalued && mos >= required;

        let ctx = NarrativeContext {
            ticker: ticker
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(narrative::DEFAULT_TICKER),
            fair_value,
            current_price,
            upside_percent: upside,
            margin_of_safety_percent: mos,
            required_margin_of_safety: required,
            category,
        };
        let (narrative, recommendation) = narrative::render(status, meets_profile_criteria, &ctx);

        tracing::debug!(
            ticker = ctx.ticker,
            status = %status,
            upside,
            margin_of_safety = mos,
            meets_profile_criteria,
            "Valuation judged"
        );

        Ok(ValuationJudgement {
            status,
            category,
            upside_percent: upside,
            margin_of_safety_percent: mos,
            required_margin_of_safety: required,
            meets_profile_criteria,
            narrative,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_undervalued_moderate_meets_criteria() {
        let j = JudgementAnalyzer::new()
            .judge(130.0, 100.0, InvestorCategory::Moderate, None)
            .unwrap();
        assert_eq!(j.status, ValuationStatus::Undervalued);
        assert!((j.upside_percent - 30.0).abs() < 1e-9);
        assert!((j.margin_of_safety_percent - 23.08).abs() < 0.01);
        assert!(j.meets_profile_criteria);
        assert!(j.narrative.starts_with("CUSTOM appears undervalued with a 23.1% margin"));
    }

    #[test]
    fn test_undervalued_conservative_falls_short() {
        let j = JudgementAnalyzer::new()
            .judge(130.0, 100.0, InvestorCategory::Conservative, Some("ACME"))
            .unwrap();
        assert_eq!(j.status, ValuationStatus::Undervalued);
        assert!(!j.meets_profile_criteria);
        assert_eq!(j.required_margin_of_safety, 30.0);
        assert!(j.narrative.contains("below the 30% threshold"));
    }

    #[test]
    fn test_minus_ten_is_fairly_valued() {
        let j = JudgementAnalyzer::new()
            .judge(90.0, 100.0, InvestorCategory::Moderate, None)
            .unwrap();
        assert_eq!(j.upside_percent, -10.0);
        assert_eq!(j.status, ValuationStatus::FairlyValued);
        assert!(!j.meets_profile_criteria);
    }

    #[test_case(115.0, ValuationStatus::FairlyValued ; "upside 15 is not undervalued")]
    #[test_case(116.0, ValuationStatus::Undervalued ; "upside 16")]
    #[test_case(89.0, ValuationStatus::Overvalued ; "upside minus 11")]
    #[test_case(100.0, ValuationStatus::FairlyValued ; "at price")]
    fn test_status_thresholds(fair_value: f64, expected: ValuationStatus) {
        let j = JudgementAnalyzer::new()
            .judge(fair_value, 100.0, InvestorCategory::Aggressive, None)
            .unwrap();
        assert_eq!(j.status, expected);
    }

    #[test]
    fn test_zero_price_is_division_by_zero() {
        assert!(matches!(
            JudgementAnalyzer::new().judge(100.0, 0.0, InvestorCategory::Moderate, None),
            Err(ValuationError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_negative_price_is_invalid() {
        assert!(matches!(
            upside_percent(100.0, -5.0),
            Err(ValuationError::InvalidAssumption { .. })
        ));
    }

    #[test]
    fn test_zero_fair_value_is_division_by_zero() {
        assert!(matches!(
            JudgementAnalyzer::new().judge(0.0, 50.0, InvestorCategory::Moderate, None),
            Err(ValuationError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_config_from_settings() {
        let mut settings = ValuationSettings::default();
        settings.undervalued_upside_pct = Some(20.0);
        settings.margin_of_safety.aggressive = Some(10.0);

        let config = JudgementConfig::from_settings(&settings);
        assert_eq!(config.undervalued_upside_pct, 20.0);
        assert_eq!(config.overvalued_upside_pct, -10.0);
        assert_eq!(config.min_margin_of_safety(InvestorCategory::Aggressive), 10.0);
        assert_eq!(config.min_margin_of_safety(InvestorCategory::Conservative), 30.0);

        let analyzer = JudgementAnalyzer::with_config(config);
        assert_eq!(analyzer.classify_status(18.0), ValuationStatus::FairlyValued);
    }
}
