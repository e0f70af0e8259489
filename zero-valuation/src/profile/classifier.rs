//! Risk profile classifier.

use std::collections::BTreeSet;

use zero_common::util::round_half_up;

use super::questionnaire;
use super::types::*;
use crate::error::{Result, ValuationError};

/// Upper bound (inclusive) of the conservative band, in percent of max score.
pub const CONSERVATIVE_MAX_PCT: f64 = 40.0;
/// Upper bound (inclusive) of the moderate band.
pub const MODERATE_MAX_PCT: f64 = 70.0;

/// Map a score percentage to a category and risk score.
///
/// Each band scales differently, so the risk score jumps at 40% and 70%.
pub fn category_for_percentage(percentage: f64) -> (InvestorCategory, u8) {
    let (category, raw) = if percentage <= CONSERVATIVE_MAX_PCT {
        (InvestorCategory::Conservative, percentage * 0.8)
    } else if percentage <= MODERATE_MAX_PCT {
        (InvestorCategory::Moderate, percentage)
    } else {
        (InvestorCategory::Aggressive, 50.0 + percentage * 0.5)
    };

    (category, round_half_up(raw).clamp(0.0, 100.0) as u8)
}

/// Check a response set against the fixed questionnaire.
fn validate_responses(responses: &[InvestorResponse]) -> Result<()> {
    let mut seen = BTreeSet::new();

    for r in responses {
        if questionnaire::question(r.question_id).is_none() {
            return Err(ValuationError::InvalidResponse {
                question_id: r.question_id,
                reason: "unknown question".into(),
            });
        }
        if !(1..=questionnaire::MAX_OPTION_SCORE).contains(&r.selected_score) {
            return Err(ValuationError::InvalidResponse {
                question_id: r.question_id,
                reason: format!("score {} is not in 1..=3", r.selected_score),
            });
        }
        if !seen.insert(r.question_id) {
            return Err(ValuationError::InvalidResponse {
                question_id: r.question_id,
                reason: "answered more than once".into(),
            });
        }
    }

    let missing: Vec<u32> = questionnaire::questions()
        .iter()
        .map(|q| q.id)
        .filter(|id| !seen.contains(id))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValuationError::IncompleteQuestionnaire { missing })
    }
}

/// Score a complete response set into a full assessment.
pub fn assess(responses: &[InvestorResponse]) -> Result<ProfileAssessment> {
    validate_responses(responses)?;

    let total_score: u32 = responses.iter().map(|r| u32::from(r.selected_score)).sum();
    let max_score = questionnaire::max_score();
    let percentage = f64::from(total_score) / f64::from(max_score) * 100.0;
    let (category, risk_score) = category_for_percentage(percentage);

    let profile = RiskProfile {
        category,
        risk_score,
    };

    tracing::debug!(
        total_score,
        percentage,
        category = %category,
        risk_score,
        "Risk profile classified"
    );

    Ok(ProfileAssessment {
        profile,
        total_score,
        max_score,
        percentage,
        gauge_band: profile.gauge_band(),
        summary: category.summary(),
    })
}

/// Score a complete response set into a risk profile.
pub fn classify(responses: &[InvestorResponse]) -> Result<RiskProfile> {
    assess(responses).map(|a| a.profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn uniform(score: u8) -> Vec<InvestorResponse> {
        (1..=12).map(|id| InvestorResponse::new(id, score)).collect()
    }

    /// Responses whose scores total `total` (12..=36).
    fn with_total(total: u32) -> Vec<InvestorResponse> {
        let mut extra = total - 12;
        (1..=12)
            .map(|id| {
                let bump = extra.min(2);
                extra -= bump;
                InvestorResponse::new(id, 1 + bump as u8)
            })
            .collect()
    }

    #[test]
    fn test_all_ones_is_conservative() {
        let assessment = assess(&uniform(1)).unwrap();
        assert_eq!(assessment.total_score, 12);
        assert_eq!(assessment.max_score, 36);
        assert!((assessment.percentage - 33.333).abs() < 0.001);
        assert_eq!(assessment.profile.category, InvestorCategory::Conservative);
        assert_eq!(assessment.profile.risk_score, 27);
        assert_eq!(assessment.gauge_band, GaugeBand::Low);
    }

    #[test]
    fn test_all_threes_is_aggressive() {
        let profile = classify(&uniform(3)).unwrap();
        assert_eq!(profile.category, InvestorCategory::Aggressive);
        assert_eq!(profile.risk_score, 100);
    }

    #[test]
    fn test_all_twos_is_moderate() {
        let profile = classify(&uniform(2)).unwrap();
        assert_eq!(profile.category, InvestorCategory::Moderate);
        assert_eq!(profile.risk_score, 67);
    }

    // 14/36 = 38.9%, 15/36 = 41.7%, 25/36 = 69.4%, 26/36 = 72.2%
    #[test_case(14, InvestorCategory::Conservative, 31 ; "last conservative total")]
    #[test_case(15, InvestorCategory::Moderate, 42 ; "first moderate total")]
    #[test_case(25, InvestorCategory::Moderate, 69 ; "last moderate total")]
    #[test_case(26, InvestorCategory::Aggressive, 86 ; "first aggressive total")]
    fn test_band_edges(total: u32, category: InvestorCategory, risk_score: u8) {
        let profile = classify(&with_total(total)).unwrap();
        assert_eq!(profile.category, category);
        assert_eq!(profile.risk_score, risk_score);
    }

    #[test_case(40.0, InvestorCategory::Conservative, 32 ; "40 is conservative")]
    #[test_case(40.01, InvestorCategory::Moderate, 40 ; "just above 40")]
    #[test_case(70.0, InvestorCategory::Moderate, 70 ; "70 is moderate")]
    #[test_case(70.01, InvestorCategory::Aggressive, 85 ; "just above 70")]
    #[test_case(0.0, InvestorCategory::Conservative, 0 ; "zero")]
    fn test_percentage_breakpoints(pct: f64, category: InvestorCategory, score: u8) {
        assert_eq!(category_for_percentage(pct), (category, score));
    }

    #[test]
    fn test_missing_answers() {
        let mut responses = uniform(2);
        responses.retain(|r| r.question_id != 5 && r.question_id != 9);
        assert_eq!(
            classify(&responses),
            Err(ValuationError::IncompleteQuestionnaire { missing: vec![5, 9] })
        );
    }

    #[test]
    fn test_duplicate_answer_rejected() {
        let mut responses = uniform(2);
        responses.push(InvestorResponse::new(3, 1));
        assert!(matches!(
            classify(&responses),
            Err(ValuationError::InvalidResponse { question_id: 3, .. })
        ));
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let mut responses = uniform(2);
        responses[0].selected_score = 4;
        assert!(matches!(
            classify(&responses),
            Err(ValuationError::InvalidResponse { question_id: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_question_rejected() {
        let mut responses = uniform(2);
        responses.push(InvestorResponse::new(13, 2));
        assert!(classify(&responses).is_err());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let responses = with_total(20);
        assert_eq!(classify(&responses), classify(&responses));
    }
}
