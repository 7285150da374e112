use super::*;
use crate::protocol::CdpResponse;
use serde_json::{Value, json};

fn event(method: &str, params: Value) -> NetworkEvent {
    let message: CdpResponse =
        serde_json::from_value(json!({ "method": method, "params": params })).unwrap();
    NetworkEvent::from_message(&message).unwrap().unwrap()
}

fn will_be_sent(id: &str, method: &str, url: &str) -> NetworkEvent {
    event(
        "Network.requestWillBeSent",
        json!({
            "requestId": id,
            "request": {"url": url, "method": method, "headers": {"Accept": "*/*"}}
        }),
    )
}

fn response_received(id: &str, status: i64, headers: Value) -> NetworkEvent {
    event(
        "Network.responseReceived",
        json!({
            "requestId": id,
            "response": {
                "url": "https://h/x",
                "status": status,
                "statusText": "OK",
                "headers": headers,
                "mimeType": "application/json",
                "encodedDataLength": 120
            }
        }),
    )
}

fn finished(id: &str, encoded: f64) -> NetworkEvent {
    event(
        "Network.loadingFinished",
        json!({"requestId": id, "encodedDataLength": encoded}),
    )
}

#[test]
fn test_full_lifecycle() {
    let mut assembler = ExchangeAssembler::new();
    assert!(
        assembler
            .handle(will_be_sent("1", "GET", "https://h/api/items?page=2"))
            .is_none()
    );
    assert!(
        assembler
            .handle(response_received(
                "1",
                200,
                json!({"Content-Type": "application/json"})
            ))
            .is_none()
    );
    assert!(
        assembler
            .handle(event(
                "Network.dataReceived",
                json!({"requestId": "1", "dataLength": 300, "encodedDataLength": 0})
            ))
            .is_none()
    );
    assert!(
        assembler
            .handle(event(
                "Network.dataReceived",
                json!({"requestId": "1", "dataLength": 212, "encodedDataLength": 0})
            ))
            .is_none()
    );
    assert_eq!(assembler.in_flight(), 1);

    let done = assembler.handle(finished("1", 640.0)).unwrap();
    assert_eq!(assembler.in_flight(), 0);
    assert_eq!(done.request_id, "1");
    assert!(done.has_content);
    assert!(!done.needs_post_data);

    let exchange = done.exchange;
    assert_eq!(exchange.method(), "GET");
    assert_eq!(exchange.url(), "https://h/api/items?page=2");
    assert_eq!(exchange.response.status, 200);
    assert_eq!(
        exchange.response_header("content-type"),
        Some("application/json")
    );
    let content = exchange.response.content.as_ref().unwrap();
    assert_eq!(content.size, Some(512.0));
    assert_eq!(content.mime_type.as_deref(), Some("application/json"));
    assert_eq!(exchange.response.transfer_size, Some(640.0));
}

#[test]
fn test_inline_post_data() {
    let mut assembler = ExchangeAssembler::new();
    assembler.handle(event(
        "Network.requestWillBeSent",
        json!({
            "requestId": "7",
            "request": {
                "url": "https://h/login",
                "method": "POST",
                "headers": {"Content-Type": "application/json"},
                "postData": "{\"user\":\"a\"}",
                "hasPostData": true
            }
        }),
    ));
    let done = assembler.handle(finished("7", 10.0)).unwrap();
    assert!(!done.needs_post_data);
    let post = done.exchange.request.post_data.unwrap();
    assert_eq!(post.text, "{\"user\":\"a\"}");
    assert_eq!(post.mime_type.as_deref(), Some("application/json"));
}

#[test]
fn test_post_data_not_inlined() {
    let mut assembler = ExchangeAssembler::new();
    assembler.handle(event(
        "Network.requestWillBeSent",
        json!({
            "requestId": "8",
            "request": {"url": "https://h/upload", "method": "POST", "hasPostData": true}
        }),
    ));
    let done = assembler.handle(finished("8", 10.0)).unwrap();
    assert!(done.needs_post_data);
    assert!(done.exchange.request.post_data.is_none());
}

#[test]
fn test_failed_request_dropped() {
    let mut assembler = ExchangeAssembler::new();
    assembler.handle(will_be_sent("3", "GET", "https://h/api/x"));
    let out = assembler.handle(event(
        "Network.loadingFailed",
        json!({"requestId": "3", "errorText": "net::ERR_ABORTED"}),
    ));
    assert!(out.is_none());
    assert_eq!(assembler.in_flight(), 0);
    assert!(assembler.handle(finished("3", 0.0)).is_none());
}

#[test]
fn test_redirect_emits_hop() {
    let mut assembler = ExchangeAssembler::new();
    assembler.handle(will_be_sent("5", "POST", "https://h/login"));

    let hop = assembler
        .handle(event(
            "Network.requestWillBeSent",
            json!({
                "requestId": "5",
                "request": {"url": "https://h/home", "method": "GET"},
                "redirectResponse": {
                    "url": "https://h/login",
                    "status": 302,
                    "statusText": "Found",
                    "headers": {"Location": "/home"}
                }
            }),
        ))
        .unwrap();

    assert!(!hop.has_content);
    assert_eq!(hop.exchange.url(), "https://h/login");
    assert_eq!(hop.exchange.response.status, 302);
    assert_eq!(hop.exchange.response_header("location"), Some("/home"));
    assert_eq!(assembler.in_flight(), 1);

    assembler.handle(response_received("5", 200, json!({})));
    let last = assembler.handle(finished("5", 50.0)).unwrap();
    assert!(last.has_content);
    assert_eq!(last.exchange.url(), "https://h/home");
    assert_eq!(last.exchange.method(), "GET");
}

#[test]
fn test_extra_info_replaces_headers() {
    let mut assembler = ExchangeAssembler::new();
    assembler.handle(will_be_sent("9", "GET", "https://h/api/me"));
    assembler.handle(event(
        "Network.requestWillBeSentExtraInfo",
        json!({
            "requestId": "9",
            "headers": {"Accept": "*/*", "Cookie": "sid=abc"}
        }),
    ));
    let done = assembler.handle(finished("9", 1.0)).unwrap();
    assert!(
        done.exchange
            .request
            .headers
            .contains(&Header::new("Cookie", "sid=abc"))
    );
}

#[test]
fn test_extra_info_before_request() {
    let mut assembler = ExchangeAssembler::new();
    assembler.handle(event(
        "Network.requestWillBeSentExtraInfo",
        json!({"requestId": "10", "headers": {"Cookie": "sid=early"}}),
    ));
    assembler.handle(will_be_sent("10", "GET", "https://h/api/me"));
    let done = assembler.handle(finished("10", 1.0)).unwrap();
    assert_eq!(
        done.exchange.request.headers,
        vec![Header::new("Cookie", "sid=early")]
    );
}

#[test]
fn test_finished_without_response() {
    let mut assembler = ExchangeAssembler::new();
    assembler.handle(will_be_sent("11", "GET", "https://h/api/cached"));
    let done = assembler.handle(finished("11", 0.0)).unwrap();
    assert_eq!(done.exchange.response.status, 0);
    assert!(done.exchange.response.content.is_none());
    assert_eq!(done.exchange.response.transfer_size, Some(0.0));
}

#[test]
fn test_untracked_events_ignored() {
    let mut assembler = ExchangeAssembler::new();
    assert!(
        assembler
            .handle(response_received("404", 200, json!({})))
            .is_none()
    );
    assert!(
        assembler
            .handle(event(
                "Network.dataReceived",
                json!({"requestId": "404", "dataLength": 10})
            ))
            .is_none()
    );
    assert!(assembler.handle(finished("404", 1.0)).is_none());
    assert_eq!(assembler.in_flight(), 0);
}

#[test]
fn test_extra_info_follows_redirect_hops() {
    let mut assembler = ExchangeAssembler::new();
    assembler.handle(will_be_sent("12", "GET", "https://h/api/start"));
    assembler.handle(event(
        "Network.requestWillBeSentExtraInfo",
        json!({"requestId": "12", "headers": {"Cookie": "hop=1"}}),
    ));
    // Extra info for the next hop arrives before its requestWillBeSent.
    assembler.handle(event(
        "Network.requestWillBeSentExtraInfo",
        json!({"requestId": "12", "headers": {"Cookie": "hop=2"}}),
    ));

    let hop = assembler
        .handle(event(
            "Network.requestWillBeSent",
            json!({
                "requestId": "12",
                "request": {"url": "https://h/api/next", "method": "GET"},
                "redirectResponse": {
                    "url": "https://h/api/start",
                    "status": 302,
                    "headers": {"Location": "/api/next"}
                }
            }),
        ))
        .unwrap();
    assert_eq!(
        hop.exchange.request.headers,
        vec![Header::new("Cookie", "hop=1")]
    );

    let last = assembler.handle(finished("12", 1.0)).unwrap();
    assert_eq!(last.exchange.url(), "https://h/api/next");
    assert_eq!(
        last.exchange.request.headers,
        vec![Header::new("Cookie", "hop=2")]
    );
}
