//! HTTP-boundary form parsing.
//!
//! Form fields arrive as numbers or numeric strings with rates in percent.
//! Absent, empty or unparsable fields fall back to a default and are
//! reported in `defaulted_fields` (and logged at `warn`). An explicit `0` is
//! honored as zero. Percent-to-fraction conversion happens here and nowhere
//! else.

use serde::{Deserialize, Serialize};

use crate::dcf::{ValuationAssumptions, ValuationMode, MAX_PROJECTION_YEARS};
use crate::error::{Result, ValuationError};
use crate::profile::InvestorCategory;

/// A loosely typed numeric form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    /// Parsed finite number, or `None` for empty or malformed input.
    pub fn parse(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

// ============================================================================
// Defaults
// ============================================================================

/// Fallback values, in form units (percent for rates).
#[derive(Debug, Clone, PartialEq)]
pub struct FormDefaults {
    pub base_cash_flow: f64,
    pub growth_rate_pct: f64,
    pub discount_rate_pct: f64,
    pub terminal_growth_rate_pct: f64,
    pub projection_years: u32,
    /// Only applied in fair-value mode
    pub ownership_pct: Option<f64>,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            base_cash_flow: 0.0,
            growth_rate_pct: 10.0,
            discount_rate_pct: 10.0,
            terminal_growth_rate_pct: 2.0,
            projection_years: 5,
            ownership_pct: None,
        }
    }
}

impl FormDefaults {
    /// Profile-conditioned defaults.
    pub fn for_category(category: InvestorCategory) -> Self {
        Self {
            base_cash_flow: 0.0,
            growth_rate_pct: category.default_growth_rate_pct(),
            discount_rate_pct: category.default_discount_rate_pct(),
            terminal_growth_rate_pct: 2.5,
            projection_years: 5,
            ownership_pct: Some(10.0),
        }
    }
}

// ============================================================================
// DCF Form
// ============================================================================

/// DCF request body as submitted by a form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfForm {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default, alias = "type")]
    pub mode: Option<ValuationMode>,
    /// Selects profile-conditioned defaults for omitted rates
    #[serde(default, alias = "investorProfile")]
    pub category: Option<InvestorCategory>,
    #[serde(default, alias = "freeCashFlow")]
    pub base_cash_flow: Option<FormValue>,
    #[serde(default)]
    pub growth_rate: Option<FormValue>,
    #[serde(default)]
    pub discount_rate: Option<FormValue>,
    #[serde(default)]
    pub terminal_growth_rate: Option<FormValue>,
    #[serde(default)]
    pub projection_years: Option<FormValue>,
    /// Ownership fraction in percent
    #[serde(default, alias = "sharesOutstandingPercent")]
    pub ownership_percent: Option<FormValue>,
    #[serde(default, alias = "expectedPE")]
    pub expected_pe: Option<FormValue>,
}

/// A form converted to engine inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedForm {
    pub assumptions: ValuationAssumptions,
    pub mode: ValuationMode,
    pub ticker: Option<String>,
    pub category: Option<InvestorCategory>,
    /// Fields that fell back to a default
    pub defaulted_fields: Vec<&'static str>,
}

struct FieldReader {
    defaulted: Vec<&'static str>,
}

impl FieldReader {
    fn read(&mut self, name: &'static str, value: &Option<FormValue>) -> Option<f64> {
        match value {
            None => None,
            Some(FormValue::Text(s)) if s.trim().is_empty() => None,
            Some(v) => {
                let parsed = v.parse();
                if parsed.is_none() {
                    tracing::warn!(field = name, value = ?v, "Unparsable form field, using default");
                }
                parsed
            }
        }
    }

    fn read_or(&mut self, name: &'static str, value: &Option<FormValue>, default: f64) -> f64 {
        self.read(name, value).unwrap_or_else(|| {
            self.defaulted.push(name);
            default
        })
    }
}

impl DcfForm {
    /// Convert to engine assumptions using `defaults` for missing fields.
    pub fn parse_with(&self, defaults: &FormDefaults) -> Result<ParsedForm> {
        let mode = self.mode.unwrap_or_default();
        let mut reader = FieldReader {
            defaulted: Vec::new(),
        };

        let base_cash_flow =
            reader.read_or("baseCashFlow", &self.base_cash_flow, defaults.base_cash_flow);
        let growth_rate =
            reader.read_or("growthRate", &self.growth_rate, defaults.growth_rate_pct) / 100.0;
        let discount_rate =
            reader.read_or("discountRate", &self.discount_rate, defaults.discount_rate_pct)
                / 100.0;
        let terminal_growth_rate = reader.read_or(
            "terminalGrowthRate",
            &self.terminal_growth_rate,
            defaults.terminal_growth_rate_pct,
        ) / 100.0;

        let years = reader.read_or(
            "projectionYears",
            &self.projection_years,
            f64::from(defaults.projection_years),
        );
        if !(1.0..=f64::from(MAX_PROJECTION_YEARS)).contains(&years) {
            return Err(ValuationError::invalid(
                "projection_years",
                format!("must be between 1 and {MAX_PROJECTION_YEARS}"),
            ));
        }
        if years.fract() != 0.0 {
            return Err(ValuationError::invalid(
                "projection_years",
                "must be a whole number of years",
            ));
        }
        let projection_years = years as u32;

        let ownership_fraction = match mode {
            ValuationMode::MarketCap => None,
            ValuationMode::FairValue => match reader.read("ownershipPercent", &self.ownership_percent) {
                Some(pct) => Some(pct / 100.0),
                None => defaults.ownership_pct.map(|pct| {
                    reader.defaulted.push("ownershipPercent");
                    pct / 100.0
                }),
            },
        };

        let expected_price_to_earnings = reader.read("expectedPe", &self.expected_pe);

        if !reader.defaulted.is_empty() {
            tracing::warn!(
                ticker = self.ticker.as_deref().unwrap_or("-"),
                defaulted = ?reader.defaulted,
                "Form fields replaced by defaults"
            );
        }

        Ok(ParsedForm {
            assumptions: ValuationAssumptions {
                base_cash_flow,
                growth_rate,
                discount_rate,
                terminal_growth_rate,
                projection_years,
                ownership_fraction,
                expected_price_to_earnings,
            },
            mode,
            ticker: self.ticker.clone(),
            category: self.category,
            defaulted_fields: reader.defaulted,
        })
    }

    /// Convert using defaults for the named category, or the plain fallbacks.
    pub fn parse(&self) -> Result<ParsedForm> {
        let defaults = self
            .category
            .map(FormDefaults::for_category)
            .unwrap_or_default();
        self.parse_with(&defaults)
    }
}
