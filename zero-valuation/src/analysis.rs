//! End-to-end analysis: DCF, judgement and distribution for one company.

use serde::{Deserialize, Serialize};
use zero_common::config::ValuationSettings;
use zero_common::util::format_compact_currency;

use crate::dcf::{DcfEngine, EngineConfig, ValuationMode, ValuationResult};
use crate::distribution::{generate_distribution, ValuationDistribution};
use crate::error::Result;
use crate::input::{DcfForm, ParsedForm};
use crate::judgement::{JudgementAnalyzer, JudgementConfig, ValuationJudgement};
use crate::profile::InvestorCategory;

/// Display strings for a DCF result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFigures {
    pub enterprise_value: String,
    pub terminal_value_present: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fair_value_per_share: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earnings_multiple_fair_value: Option<String>,
}

impl DisplayFigures {
    pub fn from_result(result: &ValuationResult) -> Self {
        Self {
            enterprise_value: format_compact_currency(result.enterprise_value),
            terminal_value_present: format_compact_currency(result.terminal_value_present),
            fair_value_per_share: result.fair_value_per_share.map(format_compact_currency),
            earnings_multiple_fair_value: result
                .earnings_multiple_fair_value
                .map(format_compact_currency),
        }
    }
}

/// DCF result plus boundary bookkeeping.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    pub result: ValuationResult,
    pub display: DisplayFigures,
    pub defaulted_fields: Vec<&'static str>,
}

/// Request for a full analysis of one company.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(flatten)]
    pub form: DcfForm,
    pub current_price: f64,
}

/// Full analysis of one company.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub ticker: String,
    pub category: InvestorCategory,
    pub dcf: DcfReport,
    pub judgement: ValuationJudgement,
    pub distribution: ValuationDistribution,
}

/// Engine, judgement analyzer and settings bundled for request handling.
#[derive(Debug, Clone, Default)]
pub struct ValuationPipeline {
    dcf: DcfEngine,
    judgement: JudgementAnalyzer,
}

impl ValuationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `valuation` config section.
    pub fn from_settings(settings: &ValuationSettings) -> Self {
        Self {
            dcf: DcfEngine::with_config(EngineConfig::from_settings(settings)),
            judgement: JudgementAnalyzer::with_config(JudgementConfig::from_settings(settings)),
        }
    }

    pub fn judgement(&self) -> &JudgementAnalyzer {
        &self.judgement
    }

    fn run(&self, parsed: ParsedForm, mode: ValuationMode) -> Result<DcfReport> {
        let result = self.dcf.value(&parsed.assumptions, mode)?;
        Ok(DcfReport {
            ticker: parsed.ticker,
            display: DisplayFigures::from_result(&result),
            result,
            defaulted_fields: parsed.defaulted_fields,
        })
    }

    /// Value a submitted form in its requested mode.
    pub fn value_form(&self, form: &DcfForm) -> Result<DcfReport> {
        let parsed = form.parse()?;
        let mode = parsed.mode;
        self.run(parsed, mode)
    }

    /// DCF, judgement and distribution in one pass.
    ///
    /// Always resolves per-share values; a form without an ownership
    /// fraction fails with `DivisionByZero`. The category defaults to
    /// moderate.
    pub fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisReport> {
        let category = request.form.category.unwrap_or(InvestorCategory::Moderate);
        let mut form = request.form.clone();
        form.mode = Some(ValuationMode::FairValue);
        let parsed = form.parse()?;
        let ticker = parsed
            .ticker
            .clone()
            .unwrap_or_else(|| crate::judgement::DEFAULT_TICKER.to_string());

        let dcf = self.run(parsed, ValuationMode::FairValue)?;
        let fair_value = dcf.result.require_fair_value()?;

        let judgement =
            self.judgement
                .judge(fair_value, request.current_price, category, Some(ticker.as_str()))?;
        let distribution = generate_distribution(fair_value, request.current_price, category)?;

        tracing::info!(
            ticker = %ticker,
            category = %category,
            fair_value,
            status = %judgement.status,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            ticker,
            category,
            dcf,
            judgement,
            distribution,
        })
    }
}
