//! Valuation judgement.
//!
//! Asymmetric status thresholds (+15 / -10 upside) and per-category margin
//! of safety minimums (30 / 15 / 5).

pub mod analyzer;
pub mod narrative;
pub mod types;

pub use analyzer::{margin_of_safety_percent, upside_percent, JudgementAnalyzer, JudgementConfig};
pub use narrative::DEFAULT_TICKER;
pub use types::{ValuationJudgement, ValuationStatus};
