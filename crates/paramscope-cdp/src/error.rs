//! CDP error types.

use paramscope_core::CoreError;
use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not found or not running with remote debugging.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    /// No page matched the requested target.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Session closed.
    #[error("Session closed")]
    SessionClosed,

    /// Invalid response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

impl From<CdpError> for CoreError {
    fn from(e: CdpError) -> Self {
        CoreError::ContentFetch(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "No resource with given identifier found".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("-32000"));
        assert!(display.contains("No resource"));
    }

    #[test]
    fn test_url_error_from() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err = CdpError::from(parse_err);
        assert!(matches!(err, CdpError::ConnectionFailed(_)));
    }

    #[test]
    fn test_into_core_error() {
        let err: CoreError = CdpError::SessionClosed.into();
        assert!(matches!(err, CoreError::ContentFetch(_)));
        assert!(err.to_string().contains("Session closed"));
    }
}
