//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cdp: CdpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chrome DevTools Protocol connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdpConfig {
    /// HTTP debugging endpoint of the browser.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-command timeout. Also bounds response body fetches.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Attach to the first page whose URL contains this text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout(),
            target: None,
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Logging output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for daily-rotated log files. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
