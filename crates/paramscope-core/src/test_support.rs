//! Builders for exchanges used across unit tests.

use crate::exchange::{Content, Header, NetworkExchange, PostData, Request, Response};

pub(crate) fn exchange(method: &str, url: &str) -> NetworkExchange {
    let request = Request {
        url: url.to_string(),
        method: method.to_string(),
        headers: Vec::new(),
        post_data: None,
    };
    let response = Response {
        status: 200,
        status_text: "OK".to_string(),
        ..Default::default()
    };
    NetworkExchange::new(request, response)
}

pub(crate) fn with_body(mut exchange: NetworkExchange, text: &str) -> NetworkExchange {
    exchange.request.post_data = Some(PostData::new(text));
    exchange
}

pub(crate) fn with_request_header(
    mut exchange: NetworkExchange,
    name: &str,
    value: &str,
) -> NetworkExchange {
    exchange.request.headers.push(Header::new(name, value));
    exchange
}

pub(crate) fn with_response_header(
    mut exchange: NetworkExchange,
    name: &str,
    value: &str,
) -> NetworkExchange {
    exchange.response.headers.push(Header::new(name, value));
    exchange
}

pub(crate) fn with_content(mut exchange: NetworkExchange, text: &str) -> NetworkExchange {
    exchange.response.content = Some(Content {
        size: Some(text.len() as f64),
        text: Some(text.to_string()),
        mime_type: None,
        encoding: None,
    });
    exchange
}
