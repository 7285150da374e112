//! Captured network exchange model.
//!
//! Shapes follow HAR 1.2 entries, which is also what browser devtools hand
//! out for finished requests. Every field is defaulted so that partially
//! formed exchanges (no headers, no response) still deserialize.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

/// A single HTTP header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Request body as captured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    #[serde(default, deserialize_with = "null_default")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl PostData {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mime_type: None,
        }
    }
}

/// Request half of an exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default, deserialize_with = "null_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_default")]
    pub headers: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
}

/// Response content block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

/// Response half of an exchange.
///
/// `body_size`, `transfer_size`, `body` and `legacy_body` are the secondary
/// fields some capture sources fill instead of `content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, deserialize_with = "null_default")]
    pub status: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub status_text: String,
    #[serde(default, deserialize_with = "null_default")]
    pub headers: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_size: Option<f64>,
    #[serde(
        rename = "_transferSize",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transfer_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(rename = "_body", default, skip_serializing_if = "Option::is_none")]
    pub legacy_body: Option<String>,
}

/// Decoded body handed back by a [`ContentFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    pub text: String,
    /// Transfer encoding of `text`, e.g. `base64`.
    pub encoding: Option<String>,
}

/// Capability to fetch an exchange's response body after the fact.
///
/// Capture sources that do not carry bodies inline (CDP) attach one of these
/// to each exchange. It is invoked at most once per resolution.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the body. `Ok(None)` means the host has no content for this
    /// exchange.
    async fn fetch_content(&self) -> Result<Option<FetchedContent>, CoreError>;
}

/// One completed request/response pair.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct NetworkExchange {
    #[serde(default, deserialize_with = "null_default")]
    pub request: Request,
    #[serde(default, deserialize_with = "null_default")]
    pub response: Response,
    #[serde(skip)]
    fetcher: Option<Arc<dyn ContentFetcher>>,
}

impl NetworkExchange {
    pub fn new(request: Request, response: Response) -> Self {
        Self {
            request,
            response,
            fetcher: None,
        }
    }

    /// Attach a body fetch capability.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn ContentFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn fetcher(&self) -> Option<&Arc<dyn ContentFetcher>> {
        self.fetcher.as_ref()
    }

    pub fn url(&self) -> &str {
        &self.request.url
    }

    pub fn method(&self) -> &str {
        &self.request.method
    }

    /// Request body text, if the request carried a non-empty one.
    pub fn body_text(&self) -> Option<&str> {
        self.request
            .post_data
            .as_ref()
            .map(|p| p.text.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn has_body(&self) -> bool {
        self.body_text().is_some()
    }

    /// First response header with the given name (case-insensitive).
    pub fn response_header(&self, name: &str) -> Option<&str> {
        self.response
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

impl fmt::Debug for NetworkExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkExchange")
            .field("request", &self.request)
            .field("response", &self.response)
            .field("fetcher", &self.fetcher.is_some())
            .finish()
    }
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "exchange_tests.rs"]
mod tests;
