//! Response body materialisation.
//!
//! Bodies can live inline on the exchange, behind a host fetch capability,
//! or in one of several legacy fields. [`resolve_body`] walks those sources
//! in order and always settles exactly once.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::exchange::{FetchedContent, NetworkExchange};

/// Maximum number of characters shown for a plain-text preview.
pub const PREVIEW_LIMIT: usize = 5000;

/// A body source read synchronously off the exchange.
type BodySource = fn(&NetworkExchange) -> Option<&str>;

/// Checked in order once no inline text or fetch capability is available.
const FALLBACK_BODY_SOURCES: &[BodySource] = &[body_field, content_text, legacy_body_field];

/// How a body is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BodyView {
    /// Parsed as JSON and re-serialised with two-space indentation.
    Structured { pretty: String },
    /// Raw text, cut to [`PREVIEW_LIMIT`] characters.
    Plain { text: String },
}

/// Progress of an asynchronously resolved body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum BodyState<T> {
    Loading,
    Absent,
    Ready(T),
}

impl<T> BodyState<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BodyState<U> {
        match self {
            BodyState::Loading => BodyState::Loading,
            BodyState::Absent => BodyState::Absent,
            BodyState::Ready(value) => BodyState::Ready(f(value)),
        }
    }

    pub fn as_ref(&self) -> BodyState<&T> {
        match self {
            BodyState::Loading => BodyState::Loading,
            BodyState::Absent => BodyState::Absent,
            BodyState::Ready(value) => BodyState::Ready(value),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, BodyState::Loading)
    }
}

impl<T> From<Option<T>> for BodyState<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => BodyState::Ready(v),
            None => BodyState::Absent,
        }
    }
}

/// Resolve the textual response body of an exchange.
///
/// Order: inline content text, then the exchange's fetch capability (a single
/// attempt; an empty or failed fetch is final), then the fallback fields.
pub async fn resolve_body(exchange: &NetworkExchange) -> Option<String> {
    if let Some(text) = inline_content(exchange) {
        return Some(text);
    }

    if let Some(fetcher) = exchange.fetcher() {
        return match fetcher.fetch_content().await {
            Ok(Some(content)) => decode_content(content),
            Ok(None) => {
                debug!("No content available for {}", exchange.url());
                None
            }
            Err(e) => {
                debug!("Content fetch failed for {}: {}", exchange.url(), e);
                None
            }
        };
    }

    FALLBACK_BODY_SOURCES
        .iter()
        .find_map(|source| source(exchange))
        .map(str::to_string)
}

/// Classify a body for the preview pane.
pub fn classify_body(text: &str) -> BodyView {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => BodyView::Structured { pretty },
            Err(_) => BodyView::Plain {
                text: truncate_chars(text, PREVIEW_LIMIT),
            },
        },
        Err(_) => BodyView::Plain {
            text: truncate_chars(text, PREVIEW_LIMIT),
        },
    }
}

fn decode_content(content: FetchedContent) -> Option<String> {
    let is_base64 = content
        .encoding
        .as_deref()
        .is_some_and(|e| e.eq_ignore_ascii_case("base64"));

    let text = if is_base64 {
        match STANDARD.decode(content.text.as_bytes()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!("Body marked base64 but failed to decode: {}", e);
                content.text
            }
        }
    } else {
        content.text
    };

    (!text.is_empty()).then_some(text)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// Inline `content.text`, decoded when the HAR marks it `base64`.
fn inline_content(exchange: &NetworkExchange) -> Option<String> {
    let content = exchange.response.content.as_ref()?;
    let text = content_text(exchange)?;
    decode_content(FetchedContent {
        text: text.to_string(),
        encoding: content.encoding.clone(),
    })
}

fn content_text(exchange: &NetworkExchange) -> Option<&str> {
    non_empty(exchange.response.content.as_ref().and_then(|c| c.text.as_ref()))
}

fn body_field(exchange: &NetworkExchange) -> Option<&str> {
    non_empty(exchange.response.body.as_ref())
}

fn legacy_body_field(exchange: &NetworkExchange) -> Option<&str> {
    non_empty(exchange.response.legacy_body.as_ref())
}

#[cfg(test)]
#[path = "body_tests.rs"]
mod tests;
