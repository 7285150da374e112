//! Data contracts handed to the presentation layer.

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::body::{BodyState, BodyView};
use crate::classifier::ExchangeId;
use crate::exchange::{Header, NetworkExchange};
use crate::params::{
    ParameterSet, extract_body_params, extract_important_headers, extract_query_params,
};

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// A size source read off the exchange.
type SizeSource = fn(&NetworkExchange) -> Option<f64>;

/// First positive value wins.
const SIZE_SOURCES: &[SizeSource] = &[content_size, body_size, transfer_size, content_length];

/// Placeholder for unknown status or size.
pub const UNKNOWN: &str = "---";

/// Request kind shown in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExchangeKind {
    #[serde(rename = "XHR")]
    Xhr,
    #[serde(rename = "fetch")]
    Fetch,
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeKind::Xhr => write!(f, "XHR"),
            ExchangeKind::Fetch => write!(f, "fetch"),
        }
    }
}

/// One line of the exchange list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRow {
    pub id: ExchangeId,
    pub method: String,
    /// `None` when the host reported no status.
    pub status: Option<u16>,
    pub display_name: String,
    /// Full URL, for tooltips.
    pub url: String,
    pub kind: ExchangeKind,
    pub size_label: String,
}

impl ExchangeRow {
    pub fn from_exchange(id: ExchangeId, exchange: &NetworkExchange) -> Self {
        Self {
            id,
            method: exchange.method().to_string(),
            status: u16::try_from(exchange.response.status)
                .ok()
                .filter(|s| *s > 0),
            display_name: display_name(exchange.url()),
            url: exchange.url().to_string(),
            kind: kind_of(exchange),
            size_label: size_label(exchange),
        }
    }

    pub fn status_label(&self) -> String {
        self.status
            .map(|s| s.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// Request body as presented in the headers tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Payload {
    /// No request body.
    None,
    /// Body decoded into parameters.
    Params(ParameterSet),
    /// Body present but yielded no parameters.
    Raw(String),
}

/// Everything shown on the request side of a selected exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestView {
    pub url: String,
    pub method: String,
    pub status_line: String,
    pub payload: Payload,
    pub headers: Vec<Header>,
    pub query: ParameterSet,
}

impl RequestView {
    pub fn from_exchange(exchange: &NetworkExchange) -> Self {
        let payload = match exchange.body_text() {
            Some(text) => {
                let params = extract_body_params(text);
                if params.is_empty() {
                    Payload::Raw(text.to_string())
                } else {
                    Payload::Params(params)
                }
            }
            None => Payload::None,
        };

        let status_line = format!(
            "{} {}",
            exchange.response.status, exchange.response.status_text
        )
        .trim_end()
        .to_string();

        Self {
            url: exchange.url().to_string(),
            method: exchange.method().to_string(),
            status_line,
            payload,
            headers: extract_important_headers(&exchange.request.headers),
            query: extract_query_params(exchange.url()),
        }
    }

    /// No payload, no important headers and no query parameters.
    pub fn is_empty(&self) -> bool {
        self.payload == Payload::None && self.headers.is_empty() && self.query.is_empty()
    }
}

/// Details of the selected exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeDetails {
    pub id: ExchangeId,
    pub request: RequestView,
    /// Classified body; plain text is truncated.
    pub preview: BodyState<BodyView>,
    /// Full raw body.
    pub response: BodyState<String>,
}

/// Details pane contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "details", rename_all = "snake_case")]
pub enum Details {
    NoneSelected,
    Selected(Box<ExchangeDetails>),
}

/// Path component of a URL, or the URL itself when it has none.
pub fn display_name(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if !parsed.path().is_empty() => parsed.path().to_string(),
        Ok(_) => url.to_string(),
        Err(_) => manual_path(url)
            .filter(|p| !p.is_empty())
            .unwrap_or(url)
            .to_string(),
    }
}

/// `XHR` when the request carried a body, otherwise `fetch`.
pub fn kind_of(exchange: &NetworkExchange) -> ExchangeKind {
    if exchange.has_body() {
        ExchangeKind::Xhr
    } else {
        ExchangeKind::Fetch
    }
}

/// Human readable response size from the first available size source.
pub fn size_label(exchange: &NetworkExchange) -> String {
    SIZE_SOURCES
        .iter()
        .find_map(|source| source(exchange).filter(|n| n.is_finite() && *n > 0.0))
        .map(format_size)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Format a byte count as `B`, `KB` or `MB`.
pub fn format_size(bytes: f64) -> String {
    let bytes = bytes.trunc();
    if bytes <= 0.0 {
        UNKNOWN.to_string()
    } else if bytes < KIB {
        format!("{}B", bytes)
    } else if bytes < MIB {
        format!("{}KB", (bytes / KIB).round())
    } else {
        format!("{}MB", (bytes / MIB).round())
    }
}

/// Everything after `scheme://host` for URLs the parser rejects.
fn manual_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))?;
    let host_end = rest.find('/')?;
    if host_end == 0 {
        return None;
    }
    Some(&rest[host_end..])
}

fn content_size(exchange: &NetworkExchange) -> Option<f64> {
    exchange.response.content.as_ref().and_then(|c| c.size)
}

fn body_size(exchange: &NetworkExchange) -> Option<f64> {
    exchange.response.body_size
}

fn transfer_size(exchange: &NetworkExchange) -> Option<f64> {
    exchange.response.transfer_size
}

fn content_length(exchange: &NetworkExchange) -> Option<f64> {
    exchange
        .response_header("content-length")
        .and_then(leading_integer)
}

/// Integer prefix of `value` after leading whitespace, so `"512abc"` is 512.
/// A `0x` prefix reads hex digits. `None` when no digit follows.
fn leading_integer(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let (radix, digits) = match rest.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end]
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
