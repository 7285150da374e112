//! Relevance classification of captured exchanges.
//!
//! An exchange is relevant when it looks like an API call made by page
//! scripts (fetch/XHR). Preflights, static assets and navigation documents
//! are dropped. Rules are evaluated in order and the first match decides.

use serde::Serialize;

use crate::exchange::NetworkExchange;

/// File extensions treated as static assets.
pub const STATIC_ASSET_EXTENSIONS: &[&str] = &[
    "css", "js", "png", "jpg", "jpeg", "gif", "svg", "ico", "woff", "woff2", "ttf", "eot",
];

/// URL fragments that mark an API endpoint.
const API_MARKERS: &[&str] = &["/api/", "/ajax/"];

/// Identifier assigned to an exchange when it enters a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExchangeId(pub u64);

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An exchange together with its relevance verdict.
#[derive(Debug, Clone)]
pub struct ClassifiedExchange {
    pub id: ExchangeId,
    pub exchange: NetworkExchange,
    pub relevant: bool,
}

impl ClassifiedExchange {
    pub fn new(id: ExchangeId, exchange: NetworkExchange) -> Self {
        let relevant = classify(&exchange);
        Self {
            id,
            exchange,
            relevant,
        }
    }
}

/// Decide whether an exchange is an API-style call.
pub fn classify(exchange: &NetworkExchange) -> bool {
    let url = exchange.url();
    let method = exchange.method();

    if method == "OPTIONS" {
        return false;
    }

    if is_static_asset(url) {
        return false;
    }

    if method == "GET" && is_html_document(exchange) {
        return false;
    }

    exchange.has_body() || API_MARKERS.iter().any(|m| url.contains(m)) || method != "GET"
}

/// True when some `.ext` segment with a static extension is followed by
/// either the end of the URL or a `?query`.
pub fn is_static_asset(url: &str) -> bool {
    url.match_indices('.').any(|(idx, _)| {
        let rest = &url[idx + 1..];
        let ext = rest.split_once('?').map_or(rest, |(head, _)| head);
        STATIC_ASSET_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    })
}

fn is_html_document(exchange: &NetworkExchange) -> bool {
    exchange
        .response
        .headers
        .iter()
        .any(|h| h.name.eq_ignore_ascii_case("content-type") && h.value.contains("text/html"))
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
