//! Configuration management for Zero valuation services.
//!
//! The service reads a single configuration file at `~/.zero-valuation/config.json`,
//! optionally extended by a modular `valuation.json` (see [`crate::config_loader`]).
//!
//! # Configuration Priority
//!
//! 1. Environment variables (ZERO_* prefix)
//! 2. `valuation.json` values
//! 3. `config.json` values
//! 4. Default values
//!
//! # Environment Variable Mapping
//!
//! - `ZERO_VALUATION_PORT` → services.valuation.port
//! - `ZERO_BIND_ADDRESS` → network.bind
//! - `ZERO_LOG_LEVEL` → observability.log_level
//! - `ZERO_LOG_FORMAT` → observability.log_format

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ResultExt};

/// Default HTTP port for the valuation service.
pub const DEFAULT_VALUATION_PORT: u16 = 4440;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".zero-valuation"),
        |dirs| dirs.home_dir().join(".zero-valuation"),
    )
}

// ============================================================================
// Network Configuration
// ============================================================================

/// Global network configuration.
///
/// Default bind address is `127.0.0.1` (local only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Bind address for the service.
    #[serde(default = "default_bind_address")]
    pub bind: String,

    /// Public URL when served behind a reverse proxy.
    #[serde(default)]
    pub public_url: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            public_url: None,
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

/// Service port configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicesConfig {
    /// Valuation engine service
    #[serde(default)]
    pub valuation: ServicePortConfig,
}

/// Individual service port configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicePortConfig {
    /// Port number for the service
    #[serde(default)]
    pub port: Option<u16>,
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets forced to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Valuation Engine Settings
// ============================================================================

/// Minimum margin of safety (%) required per investor category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarginOfSafetySettings {
    #[serde(default)]
    pub conservative: Option<f64>,
    #[serde(default)]
    pub moderate: Option<f64>,
    #[serde(default)]
    pub aggressive: Option<f64>,
}

/// Tunables for the valuation engine.
///
/// Every field is optional; unset fields fall back to the engine defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValuationSettings {
    /// Minimum required gap between discount rate and terminal growth rate
    /// (fractional, e.g. 0.0001 = 1bp).
    #[serde(default)]
    pub terminal_spread_epsilon: Option<f64>,

    /// Accept non-positive terminal spreads for exploratory use.
    #[serde(default)]
    pub allow_unconstrained_terminal: Option<bool>,

    /// Upside (%) above which a price is classified as undervalued.
    #[serde(default)]
    pub undervalued_upside_pct: Option<f64>,

    /// Upside (%) below which a price is classified as overvalued.
    #[serde(default)]
    pub overvalued_upside_pct: Option<f64>,

    /// Per-category margin of safety minimums.
    #[serde(default)]
    pub margin_of_safety: MarginOfSafetySettings,

    /// Maximum entries accepted by a single watchlist batch.
    #[serde(default)]
    pub max_batch_size: Option<usize>,

    /// Maximum JSON request body size in bytes.
    #[serde(default)]
    pub request_body_limit_bytes: Option<usize>,
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure for Zero valuation services.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// JSON Schema reference
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Network configuration (bind address)
    #[serde(default)]
    pub network: NetworkConfig,

    /// Service port configuration
    #[serde(default)]
    pub services: ServicesConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Valuation engine tunables
    #[serde(default)]
    pub valuation: ValuationSettings,
}

impl Config {
    /// Load configuration from the default directory.
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&config_dir())
    }

    /// Load `config.json` plus modular files from a directory.
    ///
    /// A missing directory or file yields the default configuration.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let merged = crate::config_loader::load_modular_config(Some(dir.to_path_buf()))?;

        let is_empty = merged.as_object().map_or(true, |obj| obj.is_empty());
        if is_empty {
            tracing::info!(dir = %dir.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        serde_json::from_value(merged)
            .context(format!("Failed to parse config from {}", dir.display()))
    }

    /// Load configuration with environment variable overrides applied.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("ZERO_VALUATION_PORT") {
            match port.parse() {
                Ok(p) => self.services.valuation.port = Some(p),
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid ZERO_VALUATION_PORT"),
            }
        }

        if let Ok(bind) = std::env::var("ZERO_BIND_ADDRESS") {
            self.network.bind = bind;
        }

        if let Ok(level) = std::env::var("ZERO_LOG_LEVEL") {
            self.observability.log_level = level;
        }

        if let Ok(format) = std::env::var("ZERO_LOG_FORMAT") {
            self.observability.log_format = format;
        }
    }

    /// Get the effective bind address.
    pub fn bind_address(&self) -> &str {
        &self.network.bind
    }

    /// Get the valuation service port.
    pub fn valuation_port(&self) -> u16 {
        self.services
            .valuation
            .port
            .unwrap_or(DEFAULT_VALUATION_PORT)
    }

    /// Get the valuation service endpoint URL.
    pub fn valuation_endpoint(&self) -> String {
        if let Some(ref url) = self.network.public_url {
            return url.trim_end_matches('/').to_string();
        }
        format!("http://{}:{}", self.bind_address(), self.valuation_port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.valuation_port(), DEFAULT_VALUATION_PORT);
        assert_eq!(config.bind_address(), "127.0.0.1");
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.observability.log_format, "pretty");
        assert!(config.valuation.terminal_spread_epsilon.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.services.valuation.port = Some(5000);
        config.valuation.margin_of_safety.conservative = Some(35.0);

        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.valuation_port(), 5000);
        assert_eq!(parsed.valuation.margin_of_safety.conservative, Some(35.0));
    }

    #[test]
    fn test_observability_aliases() {
        let parsed: Config = serde_json::from_str(
            r#"{ "observability": { "level": "debug", "format": "json" } }"#,
        )
        .unwrap();
        assert_eq!(parsed.observability.log_level, "debug");
        assert_eq!(parsed.observability.log_format, "json");
    }

    #[test]
    fn test_valuation_endpoint_prefers_public_url() {
        let mut config = Config::default();
        assert_eq!(config.valuation_endpoint(), "http://127.0.0.1:4440");

        config.network.public_url = Some("https://valuation.example.com/".into());
        assert_eq!(config.valuation_endpoint(), "https://valuation.example.com");
    }

    #[test]
    fn test_load_from_missing_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_dir(&dir.path().join("absent")).unwrap();
        assert_eq!(config.valuation_port(), DEFAULT_VALUATION_PORT);
    }

    #[test]
    fn test_load_from_dir_reads_config_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{ "services": { "valuation": { "port": 4555 } } }"#,
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.valuation_port(), 4555);
    }

    #[test]
    fn test_load_from_dir_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{ "services": { "valuation": { "port": "not-a-port" } } }"#,
        )
        .unwrap();

        let err = Config::load_from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
