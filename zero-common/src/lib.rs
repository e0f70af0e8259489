//! Zero Common - Shared configuration, errors, and logging for the Zero valuation services.
//!
//! This crate provides:
//! - Configuration types and loading (single file plus modular `valuation.json`)
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup and request tracing helpers
//! - Numeric and display helpers shared by the valuation engine

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod config_loader;
pub mod error;
pub mod logging;
pub mod util;
pub mod validation;

pub use config::{
    Config, MarginOfSafetySettings, NetworkConfig, ObservabilityConfig, ServicesConfig,
    ValuationSettings,
};
pub use error::{Error, Result};
pub use validation::{Validate, ValidationError, ValidationResult};
