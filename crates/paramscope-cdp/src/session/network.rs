//! Network domain commands.

use serde_json::json;
use tracing::debug;

use super::PageSession;
use crate::error::CdpError;
use crate::protocol::ResponseBody;

impl PageSession {
    /// Enable network event reporting for this page.
    pub(crate) async fn enable_network(&self) -> Result<(), CdpError> {
        self.call("Network.enable", None).await?;
        debug!("Enabled Network domain for session {}", self.session_id);
        Ok(())
    }

    /// Fetch the response body of a finished request.
    pub async fn get_response_body(&self, request_id: &str) -> Result<ResponseBody, CdpError> {
        let result = self
            .call(
                "Network.getResponseBody",
                Some(json!({ "requestId": request_id })),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Fetch request post data that was too large to inline in the event.
    pub async fn get_request_post_data(&self, request_id: &str) -> Result<String, CdpError> {
        let result = self
            .call(
                "Network.getRequestPostData",
                Some(json!({ "requestId": request_id })),
            )
            .await?;

        result["postData"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CdpError::InvalidResponse("Missing postData".to_string()))
    }
}
