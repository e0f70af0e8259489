//! Configuration validation for Zero valuation services.
//!
//! Provides validation logic for configuration fields to ensure
//! values are present and within valid ranges before the service starts.

use std::str::FromStr;
use thiserror::Error;

use crate::config::{Config, NetworkConfig, ObservabilityConfig, ValuationSettings};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port {port}: must be between 1 and 65535")]
    InvalidPort { port: u16, field: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.network.validate() {
            errors.push(e);
        }

        if let Some(port) = self.services.valuation.port {
            if port == 0 {
                errors.push(ValidationError::InvalidPort {
                    port,
                    field: "services.valuation.port".into(),
                });
            }
        }

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if let Err(e) = self.valuation.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load and validate configuration, applying environment overrides.
    pub fn load_and_validate() -> crate::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for NetworkConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.bind.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "network.bind".into(),
            });
        }

        if std::net::IpAddr::from_str(&self.bind).is_err() && self.bind != "localhost" {
            return Err(ValidationError::InvalidValue {
                field: "network.bind".into(),
                reason: format!("'{}' is not an IP address", self.bind),
            });
        }

        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }

        Ok(())
    }
}

impl Validate for ValuationSettings {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Some(eps) = self.terminal_spread_epsilon {
            if !eps.is_finite() || eps <= 0.0 {
                errors.push(ValidationError::InvalidValue {
                    field: "valuation.terminal_spread_epsilon".into(),
                    reason: "must be a positive number".into(),
                });
            }
        }

        if let (Some(under), Some(over)) = (self.undervalued_upside_pct, self.overvalued_upside_pct)
        {
            if over >= under {
                errors.push(ValidationError::Conflict {
                    reason: format!(
                        "overvalued_upside_pct ({over}) must be below undervalued_upside_pct ({under})"
                    ),
                });
            }
        }

        let mos = &self.margin_of_safety;
        for (name, value) in [
            ("conservative", mos.conservative),
            ("moderate", mos.moderate),
            ("aggressive", mos.aggressive),
        ] {
            if let Some(v) = value {
                if !(0.0..=100.0).contains(&v) {
                    errors.push(ValidationError::InvalidValue {
                        field: format!("valuation.margin_of_safety.{name}"),
                        reason: "must be between 0 and 100".into(),
                    });
                }
            }
        }

        if self.max_batch_size == Some(0) {
            errors.push(ValidationError::InvalidValue {
                field: "valuation.max_batch_size".into(),
                reason: "must be at least 1".into(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test_case("trace" ; "trace")]
    #[test_case("INFO" ; "uppercase info")]
    #[test_case("error" ; "error")]
    fn test_valid_log_levels(level: &str) {
        let config = ObservabilityConfig {
            log_level: level.into(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_format() {
        let config = ObservabilityConfig {
            log_format: "xml".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_invalid_bind_address() {
        let config = NetworkConfig {
            bind: "not an ip".into(),
            public_url: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_conflict() {
        let settings = ValuationSettings {
            undervalued_upside_pct: Some(5.0),
            overvalued_upside_pct: Some(10.0),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::Conflict { .. })
        ));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut settings = ValuationSettings {
            terminal_spread_epsilon: Some(-1.0),
            max_batch_size: Some(0),
            ..Default::default()
        };
        settings.margin_of_safety.moderate = Some(150.0);

        match settings.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = Config::default();
        config.services.valuation.port = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPort { port: 0, .. })
        ));
    }
}
