//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Filter levels accepted for `logging.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// First error as a [`ConfigError`], for callers that only need to bail.
    pub fn into_error(self) -> Option<ConfigError> {
        self.errors.into_iter().next().map(|e| ConfigError::InvalidValue {
            field: e.path,
            message: e.message,
        })
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_cdp(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_cdp(config: &Config, result: &mut ValidationResult) {
        let endpoint = &config.cdp.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            result.add_error(ValidationError::new(
                "cdp.endpoint",
                "endpoint must start with http:// or https://",
            ));
        }

        if config.cdp.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "cdp.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }

        if config.cdp.request_timeout_secs > 300 {
            result.add_warning(ValidationWarning::new(
                "cdp.request_timeout_secs",
                "request_timeout_secs is very high (>300), body loading may appear stuck",
            ));
        }

        if config.cdp.target.as_deref() == Some("") {
            result.add_warning(ValidationWarning::new(
                "cdp.target",
                "empty target matches the first page",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "'{}' is not a plain level ({:?}), it will be used as a filter directive",
                    config.logging.level, LOG_LEVELS
                ),
            ));
        }

        if let Some(dir) = &config.logging.dir {
            if dir.exists() && !dir.is_dir() {
                result.add_error(ValidationError::new(
                    "logging.dir",
                    format!("{:?} exists and is not a directory", dir),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
