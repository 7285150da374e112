//! Chrome DevTools Protocol (CDP) network capture.
//!
//! Connects to Chrome/Chromium via WebSocket, attaches to a page and turns
//! its Network domain events into [`paramscope_core::NetworkExchange`]s.
//!
//! ## Usage
//!
//! 1. Start Chrome with remote debugging:
//!    ```bash
//!    chrome --remote-debugging-port=9222
//!    ```
//!
//! 2. Attach and capture:
//!    ```rust,ignore
//!    let client = CdpClient::connect("http://localhost:9222").await?;
//!    let page = client.find_page(Some("example.com")).await?;
//!    let session = Arc::new(client.attach_page(&page.id).await?);
//!    let (tx, mut rx) = tokio::sync::mpsc::channel(64);
//!    tokio::spawn(run_capture(session, tx));
//!    while let Some(exchange) = rx.recv().await { /* ... */ }
//!    ```

mod capture;
mod client;
mod content;
mod error;
mod protocol;
mod session;

pub use capture::{CompletedRequest, ExchangeAssembler, run_capture};
pub use client::{CdpClient, DEFAULT_REQUEST_TIMEOUT, browser_version, list_targets};
pub use content::CdpContentFetcher;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
