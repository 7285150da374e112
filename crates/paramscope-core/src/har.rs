//! HAR (HTTP Archive) capture files.
//!
//! A HAR log is an offline stand-in for a live capture: its entries are
//! replayed as network exchanges in file order.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::CoreError;
use crate::exchange::NetworkExchange;

#[derive(Debug, Deserialize)]
struct HarDocument {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    #[serde(default)]
    entries: Vec<NetworkExchange>,
}

/// Parse HAR JSON into exchanges.
pub fn parse_har(content: &str) -> Result<Vec<NetworkExchange>, CoreError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if value.get("log").is_none() {
        return Err(CoreError::InvalidHar("missing \"log\" object".to_string()));
    }
    let document: HarDocument = serde_json::from_value(value)
        .map_err(|e| CoreError::InvalidHar(e.to_string()))?;
    debug!("Parsed HAR with {} entries", document.log.entries.len());
    Ok(document.log.entries)
}

/// Load a HAR file from disk.
pub fn load_har(path: &Path) -> Result<Vec<NetworkExchange>, CoreError> {
    let content = fs::read_to_string(path)?;
    parse_har(&content)
}
