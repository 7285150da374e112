//! CDP protocol types and message definitions.

use paramscope_core::Header;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// CDP request message.
#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// CDP response or event message.
#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
    pub params: Option<Value>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// CDP error in response.
#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
    pub data: Option<String>,
}

/// Page info from /json endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub title: String,
    pub url: String,
    pub web_socket_debugger_url: Option<String>,
    pub dev_tools_frontend_url: Option<String>,
}

/// Browser version info.
///
/// Note: Chrome returns PascalCase field names for this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: String,
    #[serde(rename = "User-Agent")]
    pub user_agent: String,
    #[serde(rename = "V8-Version")]
    pub v8_version: Option<String>,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

// ============================================================================
// Network Domain
// ============================================================================

/// `Network.Request`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRequest {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
    pub post_data: Option<String>,
    pub has_post_data: Option<bool>,
}

/// `Network.Response`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkResponse {
    pub url: String,
    pub status: i64,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
    pub mime_type: Option<String>,
    pub encoded_data_length: Option<f64>,
}

/// `Network.requestWillBeSent` params.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSent {
    pub request_id: String,
    pub request: NetworkRequest,
    /// Set when this event continues a redirect chain.
    pub redirect_response: Option<NetworkResponse>,
}

/// `Network.requestWillBeSentExtraInfo` params.
///
/// Carries the headers as actually sent, including `Cookie`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestExtraInfo {
    pub request_id: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
}

/// `Network.responseReceived` params.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceived {
    pub request_id: String,
    pub response: NetworkResponse,
}

/// `Network.dataReceived` params.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataReceived {
    pub request_id: String,
    pub data_length: f64,
}

/// `Network.loadingFinished` params.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFinished {
    pub request_id: String,
    pub encoded_data_length: f64,
}

/// `Network.loadingFailed` params.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFailed {
    pub request_id: String,
    #[serde(default)]
    pub error_text: String,
}

/// `Network.getResponseBody` result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub body: String,
    pub base64_encoded: bool,
}

/// Network domain events the capture cares about.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    RequestWillBeSent(RequestWillBeSent),
    RequestExtraInfo(RequestExtraInfo),
    ResponseReceived(ResponseReceived),
    DataReceived(DataReceived),
    LoadingFinished(LoadingFinished),
    LoadingFailed(LoadingFailed),
}

impl NetworkEvent {
    /// Decode an event message. Returns `None` for events of other kinds.
    pub fn from_message(message: &CdpResponse) -> Option<Result<Self, serde_json::Error>> {
        let method = message.method.as_deref()?;
        let params = message.params.clone().unwrap_or(Value::Null);

        let event = match method {
            "Network.requestWillBeSent" => {
                serde_json::from_value(params).map(NetworkEvent::RequestWillBeSent)
            }
            "Network.requestWillBeSentExtraInfo" => {
                serde_json::from_value(params).map(NetworkEvent::RequestExtraInfo)
            }
            "Network.responseReceived" => {
                serde_json::from_value(params).map(NetworkEvent::ResponseReceived)
            }
            "Network.dataReceived" => serde_json::from_value(params).map(NetworkEvent::DataReceived),
            "Network.loadingFinished" => {
                serde_json::from_value(params).map(NetworkEvent::LoadingFinished)
            }
            "Network.loadingFailed" => {
                serde_json::from_value(params).map(NetworkEvent::LoadingFailed)
            }
            _ => return None,
        };
        Some(event)
    }

    pub fn request_id(&self) -> &str {
        match self {
            NetworkEvent::RequestWillBeSent(e) => &e.request_id,
            NetworkEvent::RequestExtraInfo(e) => &e.request_id,
            NetworkEvent::ResponseReceived(e) => &e.request_id,
            NetworkEvent::DataReceived(e) => &e.request_id,
            NetworkEvent::LoadingFinished(e) => &e.request_id,
            NetworkEvent::LoadingFailed(e) => &e.request_id,
        }
    }
}

/// Convert a CDP header object into an ordered header list.
///
/// Repeated headers arrive joined by newlines and are split back out.
pub fn header_list(headers: &Map<String, Value>) -> Vec<Header> {
    let mut list = Vec::with_capacity(headers.len());
    for (name, value) in headers {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        for part in value.split('\n') {
            list.push(Header::new(name.clone(), part));
        }
    }
    list
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
