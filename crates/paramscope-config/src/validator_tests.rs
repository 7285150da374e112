use super::*;
use std::path::PathBuf;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_invalid_endpoint() {
    let mut config = Config::default();
    config.cdp.endpoint = "localhost:9222".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "cdp.endpoint"));
}

#[test]
fn test_validate_zero_timeout() {
    let mut config = Config::default();
    config.cdp.request_timeout_secs = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.path == "cdp.request_timeout_secs")
    );
}

#[test]
fn test_validate_high_timeout_warning() {
    let mut config = Config::default();
    config.cdp.request_timeout_secs = 3600;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(!result.warnings.is_empty());
}

#[test]
fn test_validate_empty_target_warning() {
    let mut config = Config::default();
    config.cdp.target = Some(String::new());

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "cdp.target"));
}

#[test]
fn test_validate_filter_directive_level() {
    let mut config = Config::default();
    config.logging.level = "paramscope=debug".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "logging.level"));
}

#[test]
fn test_validate_uppercase_level() {
    let mut config = Config::default();
    config.logging.level = "DEBUG".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_log_dir_is_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut config = Config::default();
    config.logging.dir = Some(file.path().to_path_buf());

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "logging.dir"));
}

#[test]
fn test_validate_missing_log_dir_ok() {
    let mut config = Config::default();
    config.logging.dir = Some(PathBuf::from("/nonexistent/paramscope/logs"));

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
}

#[test]
fn test_into_error() {
    let mut config = Config::default();
    config.cdp.endpoint = "ws://x".to_string();

    let err = ConfigValidator::validate(&config).into_error().unwrap();
    assert!(err.to_string().contains("cdp.endpoint"));
    assert!(ConfigValidator::validate(&Config::default()).into_error().is_none());
}
