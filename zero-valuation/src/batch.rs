//! Watchlist batch valuation.
//!
//! Runs are independent, so entries are analyzed in parallel on the rayon
//! pool. Output order matches input order and one failed entry does not
//! fail the batch.

use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::{AnalysisReport, AnalyzeRequest, ValuationPipeline};
use crate::error::{ApiError, Result, ValuationError};

/// Default maximum entries per batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

/// Outcome for one watchlist entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl BatchEntry {
    fn from_outcome(index: usize, ticker: Option<String>, outcome: Result<AnalysisReport>) -> Self {
        match outcome {
            Ok(report) => Self {
                index,
                ticker,
                report: Some(report),
                error: None,
            },
            Err(e) => Self {
                index,
                ticker,
                report: None,
                error: Some(ApiError {
                    code: e.code().to_string(),
                    message: e.to_string(),
                }),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.report.is_some()
    }
}

/// Batch summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub entries: Vec<BatchEntry>,
}

/// Analyze many companies in parallel.
pub fn analyze_watchlist(
    pipeline: &ValuationPipeline,
    requests: &[AnalyzeRequest],
    max_batch_size: usize,
) -> Result<BatchReport> {
    if requests.len() > max_batch_size {
        return Err(ValuationError::invalid(
            "watchlist",
            format!("has {} entries, limit is {max_batch_size}", requests.len()),
        ));
    }

    let start = std::time::Instant::now();

    let entries: Vec<BatchEntry> = requests
        .par_iter()
        .enumerate()
        .map(|(index, request)| {
            BatchEntry::from_outcome(index, request.form.ticker.clone(), pipeline.analyze(request))
        })
        .collect();

    let succeeded = entries.iter().filter(|e| e.is_ok()).count();
    let failed = entries.len() - succeeded;

    tracing::info!(
        total = entries.len(),
        succeeded,
        failed,
        duration_ms = start.elapsed().as_millis() as u64,
        "Watchlist batch analyzed"
    );

    Ok(BatchReport {
        total: entries.len(),
        succeeded,
        failed,
        entries,
    })
}
