//! Valuation judgement types.

use serde::{Deserialize, Serialize};

use crate::profile::InvestorCategory;

/// Price relative to fair value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationStatus {
    Undervalued,
    FairlyValued,
    Overvalued,
}

impl std::fmt::Display for ValuationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undervalued => write!(f, "undervalued"),
            Self::FairlyValued => write!(f, "fairly_valued"),
            Self::Overvalued => write!(f, "overvalued"),
        }
    }
}

/// Judgement of a fair value against a current price for one investor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationJudgement {
    pub status: ValuationStatus,
    pub category: InvestorCategory,
    /// (fair - price) / price * 100
    pub upside_percent: f64,
    /// (fair - price) / fair * 100
    pub margin_of_safety_percent: f64,
    /// Minimum margin of safety applied for the category
    pub required_margin_of_safety: f64,
    pub meets_profile_criteria: bool,
    pub narrative: String,
    pub recommendation: String,
}
