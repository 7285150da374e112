//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::{RwLock, mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::error::CdpError;
use crate::protocol::{BrowserVersion, CdpRequest, CdpResponse, PageInfo};
use crate::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

type EventHandlers = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<CdpResponse>>>>;

/// Default timeout for a single CDP command.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pending request waiting for response.
struct PendingRequest {
    tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// Command channel shared by the client and every attached session.
pub(crate) struct Transport {
    ws_tx: tokio::sync::Mutex<WsSink>,
    request_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingRequest>>,
    timeout: Duration,
}

impl Transport {
    /// Send a CDP command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    /// Resolve a pending request from a response message.
    fn resolve(&self, id: u64, resp: CdpResponse) {
        let Some(req) = self.pending.lock().remove(&id) else {
            trace!("Response for unknown request {}", id);
            return;
        };
        let result = match resp.error {
            Some(error) => Err(CdpError::Protocol {
                code: error.code,
                message: error.message,
            }),
            None => Ok(resp.result.unwrap_or(Value::Null)),
        };
        let _ = req.tx.send(result);
    }

    /// Fail every in-flight request once the socket is gone.
    fn close(&self) {
        let drained: Vec<_> = self.pending.lock().drain().collect();
        for (_, req) in drained {
            let _ = req.tx.send(Err(CdpError::SessionClosed));
        }
    }
}

/// CDP client for observing browser pages.
///
/// Connects to Chrome via WebSocket and attaches to page targets.
pub struct CdpClient {
    /// HTTP endpoint for page discovery.
    http_endpoint: String,
    /// Browser WebSocket URL.
    browser_ws_url: String,
    transport: Arc<Transport>,
    /// Event handlers by session ID.
    event_handlers: EventHandlers,
    /// Background task handle.
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Chrome debugging endpoint (e.g., "http://localhost:9222")
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let client = CdpClient::connect("http://localhost:9222").await?;
    /// ```
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        Self::connect_with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT).await
    }

    /// Connect with a custom per-command timeout.
    pub async fn connect_with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        let version = browser_version(&http_endpoint).await?;

        info!(
            browser = %version.browser,
            protocol = %version.protocol_version,
            "Connected to browser"
        );

        let browser_ws_url = version.web_socket_debugger_url;

        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let transport = Arc::new(Transport {
            ws_tx: tokio::sync::Mutex::new(ws_sink),
            request_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            timeout,
        });
        let event_handlers: EventHandlers = Arc::new(RwLock::new(HashMap::new()));

        let recv_task = {
            let transport = transport.clone();
            let event_handlers = event_handlers.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, &transport, &event_handlers).await;
                transport.close();
                // Dropping the senders ends every session's event stream.
                event_handlers.write().await.clear();
            })
        };

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            http_endpoint,
            browser_ws_url,
            transport,
            event_handlers,
            _recv_task: recv_task,
        })
    }

    /// WebSocket receive loop.
    async fn receive_loop(
        mut ws_source: WsSource,
        transport: &Transport,
        event_handlers: &EventHandlers,
    ) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => {
                            if let Some(id) = resp.id {
                                transport.resolve(id, resp);
                            } else if resp.method.is_some() {
                                let session_id = resp.session_id.clone().unwrap_or_default();
                                let handlers = event_handlers.read().await;
                                if let Some(tx) = handlers.get(&session_id) {
                                    let _ = tx.send(resp);
                                }
                            }
                        }
                        Err(e) => {
                            warn!("Failed to parse CDP message: {}", e);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.call(method, params, None).await
    }

    /// Get browser WebSocket URL.
    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// List all targets known to the browser.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        list_targets(&self.http_endpoint).await
    }

    /// Find the page to observe.
    ///
    /// With a target, the first page whose URL or title contains it wins.
    /// Without one, the first page is used.
    pub async fn find_page(&self, target: Option<&str>) -> Result<PageInfo, CdpError> {
        let pages = self.list_pages().await?;
        select_page(pages, target)
    }

    /// Attach to an existing page and enable network observation on it.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.event_handlers
            .write()
            .await
            .insert(session_id.clone(), event_tx);

        let session = PageSession::new(
            target_id.to_string(),
            session_id,
            self.transport.clone(),
            event_rx,
        );

        session.enable_network().await?;

        Ok(session)
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self._recv_task.abort();
        self.transport.close();
    }
}

/// Fetch `/json/version` to find the browser WebSocket URL.
pub async fn browser_version(http_endpoint: &str) -> Result<BrowserVersion, CdpError> {
    let base = Url::parse(http_endpoint)?;
    let version_url = base.join("json/version")?;
    debug!("Fetching browser version from {}", version_url);

    let unavailable =
        |e: reqwest::Error| CdpError::ChromeNotAvailable(format!("{}: {}", http_endpoint, e));
    reqwest::get(version_url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(unavailable)?
        .json()
        .await
        .map_err(unavailable)
}

/// Fetch `/json/list`.
pub async fn list_targets(http_endpoint: &str) -> Result<Vec<PageInfo>, CdpError> {
    let url = Url::parse(http_endpoint)?.join("json/list")?;
    let pages: Vec<PageInfo> = reqwest::get(url).await?.error_for_status()?.json().await?;
    Ok(pages)
}

/// Pick a page target from the discovery list.
fn select_page(pages: Vec<PageInfo>, target: Option<&str>) -> Result<PageInfo, CdpError> {
    let mut candidates = pages.into_iter().filter(|p| p.page_type == "page");
    match target {
        Some(t) => candidates
            .find(|p| p.url.contains(t) || p.title.contains(t))
            .ok_or_else(|| CdpError::PageNotFound(t.to_string())),
        None => candidates
            .next()
            .ok_or_else(|| CdpError::PageNotFound("no open pages".to_string())),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
