//! Response body fetching through a page session.

use std::sync::Arc;

use async_trait::async_trait;
use paramscope_core::{ContentFetcher, CoreError, FetchedContent};
use tracing::debug;

use crate::error::CdpError;
use crate::session::PageSession;

/// Fetches one request's response body with `Network.getResponseBody`.
#[derive(Debug)]
pub struct CdpContentFetcher {
    session: Arc<PageSession>,
    request_id: String,
}

impl CdpContentFetcher {
    pub fn new(session: Arc<PageSession>, request_id: impl Into<String>) -> Self {
        Self {
            session,
            request_id: request_id.into(),
        }
    }
}

#[async_trait]
impl ContentFetcher for CdpContentFetcher {
    async fn fetch_content(&self) -> Result<Option<FetchedContent>, CoreError> {
        match self.session.get_response_body(&self.request_id).await {
            Ok(body) => Ok(Some(FetchedContent {
                text: body.body,
                encoding: body.base64_encoded.then(|| "base64".to_string()),
            })),
            // Evicted from the page's buffer, or never had a body.
            Err(CdpError::Protocol { code, message }) => {
                debug!(
                    request_id = %self.request_id,
                    code,
                    "No response body: {}",
                    message
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
