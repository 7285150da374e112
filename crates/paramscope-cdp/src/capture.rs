//! Network capture: turns CDP Network events into [`NetworkExchange`]s.
//!
//! Chrome reports a request as a series of events keyed by `requestId`.
//! [`ExchangeAssembler`] correlates them and emits one exchange per finished
//! request (and one per redirect hop). [`run_capture`] drives it from a
//! page session and attaches a body fetcher to every emitted exchange.

use std::collections::HashMap;
use std::sync::Arc;

use paramscope_core::{Content, Header, NetworkExchange, PostData, Request, Response};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::content::CdpContentFetcher;
use crate::error::CdpError;
use crate::protocol::{NetworkEvent, NetworkRequest, NetworkResponse, header_list};
use crate::session::PageSession;

/// A request that has reached a terminal state.
#[derive(Debug)]
pub struct CompletedRequest {
    pub request_id: String,
    pub exchange: NetworkExchange,
    /// The request announced a body that was not inlined in the event.
    pub needs_post_data: bool,
    /// The page holds a response body for this request. Redirect hops do not.
    pub has_content: bool,
}

#[derive(Debug)]
struct InFlight {
    request: Request,
    needs_post_data: bool,
    response: Option<Response>,
    data_length: f64,
    /// Extra-info headers already replaced the provisional ones. Further
    /// extra info for this id belongs to the next redirect hop.
    extra_headers_applied: bool,
}

/// Correlates Network domain events by request id.
#[derive(Debug, Default)]
pub struct ExchangeAssembler {
    in_flight: HashMap<String, InFlight>,
    /// Headers reported before their `requestWillBeSent`, keyed by id.
    early_headers: HashMap<String, Vec<Header>>,
}

impl ExchangeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests still waiting for a terminal event.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Feed one event. Returns the request it completed, if any.
    pub fn handle(&mut self, event: NetworkEvent) -> Option<CompletedRequest> {
        match event {
            NetworkEvent::RequestWillBeSent(e) => {
                let hop = match (e.redirect_response, self.in_flight.remove(&e.request_id)) {
                    (Some(redirect), Some(mut previous)) => {
                        previous.response = Some(convert_response(redirect));
                        Some(finish(e.request_id.clone(), previous, None, false))
                    }
                    _ => None,
                };

                let mut entry = start(e.request);
                if let Some(headers) = self.early_headers.remove(&e.request_id) {
                    entry.request.headers = headers;
                    entry.extra_headers_applied = true;
                }
                self.in_flight.insert(e.request_id, entry);
                hop
            }
            NetworkEvent::RequestExtraInfo(e) => {
                let headers = header_list(&e.headers);
                if headers.is_empty() {
                    return None;
                }
                match self.in_flight.get_mut(&e.request_id) {
                    Some(entry) if !entry.extra_headers_applied => {
                        entry.request.headers = headers;
                        entry.extra_headers_applied = true;
                    }
                    _ => {
                        self.early_headers.insert(e.request_id, headers);
                    }
                }
                None
            }
            NetworkEvent::ResponseReceived(e) => {
                match self.in_flight.get_mut(&e.request_id) {
                    Some(entry) => entry.response = Some(convert_response(e.response)),
                    None => trace!(request_id = %e.request_id, "Response for untracked request"),
                }
                None
            }
            NetworkEvent::DataReceived(e) => {
                if let Some(entry) = self.in_flight.get_mut(&e.request_id) {
                    entry.data_length += e.data_length;
                }
                None
            }
            NetworkEvent::LoadingFinished(e) => {
                self.early_headers.remove(&e.request_id);
                let entry = self.in_flight.remove(&e.request_id)?;
                Some(finish(
                    e.request_id,
                    entry,
                    Some(e.encoded_data_length),
                    true,
                ))
            }
            NetworkEvent::LoadingFailed(e) => {
                self.early_headers.remove(&e.request_id);
                if let Some(entry) = self.in_flight.remove(&e.request_id) {
                    debug!(
                        request_id = %e.request_id,
                        url = %entry.request.url,
                        error = %e.error_text,
                        "Request failed, not recorded"
                    );
                }
                None
            }
        }
    }
}

fn start(request: NetworkRequest) -> InFlight {
    let needs_post_data = request.has_post_data == Some(true) && request.post_data.is_none();
    let headers = header_list(&request.headers);
    let mime_type = headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("content-type"))
        .map(|h| h.value.clone());
    let post_data = request.post_data.map(|text| PostData {
        text,
        mime_type,
    });

    InFlight {
        request: Request {
            url: request.url,
            method: request.method,
            headers,
            post_data,
        },
        needs_post_data,
        response: None,
        data_length: 0.0,
        extra_headers_applied: false,
    }
}

fn convert_response(response: NetworkResponse) -> Response {
    Response {
        status: response.status,
        status_text: response.status_text,
        headers: header_list(&response.headers),
        content: Some(Content {
            mime_type: response.mime_type,
            ..Content::default()
        }),
        transfer_size: response.encoded_data_length,
        ..Response::default()
    }
}

fn finish(
    request_id: String,
    entry: InFlight,
    encoded_data_length: Option<f64>,
    has_content: bool,
) -> CompletedRequest {
    let mut response = entry.response.unwrap_or_default();
    if entry.data_length > 0.0 {
        response.content.get_or_insert_with(Content::default).size = Some(entry.data_length);
    }
    if let Some(length) = encoded_data_length {
        response.transfer_size = Some(length);
    }

    CompletedRequest {
        request_id,
        exchange: NetworkExchange::new(entry.request, response),
        needs_post_data: entry.needs_post_data,
        has_content,
    }
}

/// Capture a page's network traffic until the session or the receiver goes away.
///
/// Every exchange with a fetchable body carries a [`CdpContentFetcher`].
/// Request bodies too large to be inlined are fetched before the exchange is
/// sent, so exchanges arrive in completion order.
pub async fn run_capture(
    session: Arc<PageSession>,
    tx: mpsc::Sender<NetworkExchange>,
) -> Result<(), CdpError> {
    let mut events = session.take_events().ok_or_else(|| {
        CdpError::InvalidResponse("session event stream already taken".to_string())
    })?;
    let mut assembler = ExchangeAssembler::new();

    while let Some(message) = events.recv().await {
        let event = match NetworkEvent::from_message(&message) {
            Some(Ok(event)) => event,
            Some(Err(e)) => {
                warn!(method = ?message.method, "Failed to decode network event: {}", e);
                continue;
            }
            None => continue,
        };

        let Some(completed) = assembler.handle(event) else {
            continue;
        };

        let CompletedRequest {
            request_id,
            mut exchange,
            needs_post_data,
            has_content,
        } = completed;

        if needs_post_data {
            match session.get_request_post_data(&request_id).await {
                Ok(text) => {
                    let mime_type = exchange
                        .request
                        .headers
                        .iter()
                        .find(|h| h.name.eq_ignore_ascii_case("content-type"))
                        .map(|h| h.value.clone());
                    exchange.request.post_data = Some(PostData { text, mime_type });
                }
                Err(e) => debug!(request_id = %request_id, "Post data unavailable: {}", e),
            }
        }

        if has_content {
            exchange = exchange.with_fetcher(Arc::new(CdpContentFetcher::new(
                session.clone(),
                request_id,
            )));
        }

        if tx.send(exchange).await.is_err() {
            debug!("Exchange receiver dropped, stopping capture");
            return Ok(());
        }
    }

    debug!(
        pending = assembler.in_flight(),
        "Session event stream closed, stopping capture"
    );
    Ok(())
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
