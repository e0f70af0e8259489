//! Investor risk profiling.
//!
//! Scores the fixed 12-question questionnaire into a category and a 0-100
//! risk score.

pub mod classifier;
pub mod questionnaire;
pub mod types;

pub use classifier::{assess, category_for_percentage, classify};
pub use questionnaire::{questions, AnswerOption, Question};
pub use types::{
    AnswerInput, GaugeBand, InvestorCategory, InvestorResponse, ProfileAssessment,
    ProfileSummary, RiskProfile,
};
