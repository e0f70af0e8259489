//! Investor profile types.

use serde::{Deserialize, Serialize};

use super::questionnaire;
use crate::error::{Result, ValuationError};

// ============================================================================
// Investor Category
// ============================================================================

/// Risk-tolerance classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestorCategory {
    Conservative,
    Moderate,
    Aggressive,
}

impl std::fmt::Display for InvestorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conservative => write!(f, "conservative"),
            Self::Moderate => write!(f, "moderate"),
            Self::Aggressive => write!(f, "aggressive"),
        }
    }
}

impl InvestorCategory {
    /// Built-in minimum margin of safety (%) for a category.
    pub fn default_min_margin_of_safety(&self) -> f64 {
        match self {
            Self::Conservative => 30.0,
            Self::Moderate => 15.0,
            Self::Aggressive => 5.0,
        }
    }

    /// Default discount rate (%) suggested for this profile.
    pub fn default_discount_rate_pct(&self) -> f64 {
        match self {
            Self::Conservative => 12.0,
            Self::Moderate => 10.0,
            Self::Aggressive => 8.0,
        }
    }

    /// Default growth rate (%) suggested for this profile.
    pub fn default_growth_rate_pct(&self) -> f64 {
        match self {
            Self::Conservative => 10.0,
            Self::Moderate => 15.0,
            Self::Aggressive => 20.0,
        }
    }

    /// Descriptive profile card.
    pub fn summary(&self) -> ProfileSummary {
        match self {
            Self::Conservative => ProfileSummary {
                title: "Conservative Investor",
                description: "You prioritize capital preservation and stable income over \
                    aggressive growth. Your investment approach focuses on minimizing risk \
                    while generating consistent returns.",
                expected_return: "4-8%",
                risk_level: "Low",
                time_horizon: "5+ years",
                characteristics: &[
                    "Prefers low-volatility investments",
                    "Values dividend income and stability",
                    "Long-term, patient approach",
                    "Lower risk tolerance",
                ],
                suitable_strategies: &[
                    "Blue-chip dividend stocks",
                    "Investment-grade bonds",
                    "Index funds with low volatility",
                    "High margin of safety requirements",
                ],
            },
            Self::Moderate => ProfileSummary {
                title: "Moderate Investor",
                description: "You seek a balanced approach between growth and stability. \
                    You're comfortable with moderate market fluctuations in pursuit of \
                    reasonable returns.",
                expected_return: "8-15%",
                risk_level: "Medium",
                time_horizon: "3-7 years",
                characteristics: &[
                    "Balanced risk-reward approach",
                    "Diversified portfolio strategy",
                    "Comfortable with market cycles",
                    "Medium-term outlook",
                ],
                suitable_strategies: &[
                    "Mix of growth and value stocks",
                    "Diversified ETF portfolios",
                    "Some exposure to emerging markets",
                    "Moderate margin of safety",
                ],
            },
            Self::Aggressive => ProfileSummary {
                title: "Aggressive Investor",
                description: "You're focused on maximizing returns and are comfortable with \
                    significant volatility. You see market downturns as buying opportunities.",
                expected_return: "15%+",
                risk_level: "High",
                time_horizon: "7+ years",
                characteristics: &[
                    "High risk tolerance",
                    "Growth-focused strategy",
                    "Active portfolio management",
                    "Opportunistic approach",
                ],
                suitable_strategies: &[
                    "High-growth technology stocks",
                    "Emerging markets exposure",
                    "Small-cap opportunities",
                    "Lower margin of safety acceptable",
                ],
            },
        }
    }
}

/// Static description of a category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub title: &'static str,
    pub description: &'static str,
    pub expected_return: &'static str,
    pub risk_level: &'static str,
    pub time_horizon: &'static str,
    pub characteristics: &'static [&'static str],
    pub suitable_strategies: &'static [&'static str],
}

// ============================================================================
// Responses
// ============================================================================

/// A scored answer to one questionnaire question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorResponse {
    pub question_id: u32,
    pub selected_score: u8,
}

impl InvestorResponse {
    pub fn new(question_id: u32, selected_score: u8) -> Self {
        Self {
            question_id,
            selected_score,
        }
    }

    /// Build a response from the chosen option index (0-based).
    pub fn from_option(question_id: u32, option_index: usize) -> Result<Self> {
        let question =
            questionnaire::question(question_id).ok_or_else(|| ValuationError::InvalidResponse {
                question_id,
                reason: "unknown question".into(),
            })?;

        let score =
            question
                .score_for_option(option_index)
                .ok_or_else(|| ValuationError::InvalidResponse {
                    question_id,
                    reason: format!("option index {option_index} out of range"),
                })?;

        Ok(Self::new(question_id, score))
    }
}

/// Wire form of an answer: either a score or an option index.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: u32,
    #[serde(default)]
    pub selected_score: Option<u8>,
    #[serde(default)]
    pub option_index: Option<usize>,
}

impl AnswerInput {
    /// Resolve to a scored response. A score wins over an option index.
    pub fn resolve(&self) -> Result<InvestorResponse> {
        match (self.selected_score, self.option_index) {
            (Some(score), _) => Ok(InvestorResponse::new(self.question_id, score)),
            (None, Some(index)) => InvestorResponse::from_option(self.question_id, index),
            (None, None) => Err(ValuationError::InvalidResponse {
                question_id: self.question_id,
                reason: "neither selectedScore nor optionIndex given".into(),
            }),
        }
    }
}

// ============================================================================
// Risk Profile
// ============================================================================

/// Gauge band for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeBand {
    Low,
    Medium,
    High,
}

impl GaugeBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=33 => Self::Low,
            34..=66 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// Classified investor profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub category: InvestorCategory,
    /// 0-100
    pub risk_score: u8,
}

impl RiskProfile {
    pub fn gauge_band(&self) -> GaugeBand {
        GaugeBand::for_score(self.risk_score)
    }
}

/// Classifier output with scoring detail and the profile card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAssessment {
    #[serde(flatten)]
    pub profile: RiskProfile,
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub gauge_band: GaugeBand,
    pub summary: ProfileSummary,
}
