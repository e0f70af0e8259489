//! Discounted cash flow valuation.
//!
//! Pure, synchronous functions over immutable inputs:
//! - Cash-flow projection at a constant growth rate
//! - Present-value discounting
//! - Gordon Growth terminal value with a degenerate-spread guard
//! - Enterprise value and ownership-proxy per-share estimates

pub mod discount;
pub mod engine;
pub mod projection;
pub mod resolver;
pub mod types;

pub use discount::{present_value, terminal_value};
pub use engine::DcfEngine;
pub use projection::project_cash_flows;
pub use resolver::{enterprise_value, resolve_fair_value};
pub use types::{
    EngineConfig, FairValueEstimate, ProjectedCashFlow, TerminalPolicy, ValuationAssumptions,
    ValuationMode, ValuationResult, EARNINGS_PROXY_MARKUP, MAX_PROJECTION_YEARS,
};
