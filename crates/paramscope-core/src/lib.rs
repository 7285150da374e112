//! # Paramscope Core
//!
//! Exchange classification, parameter extraction, response materialisation
//! and session state for the paramscope inspector.
//!
//! ## Pipeline
//!
//! ```text
//! network events ─► classify ─► SessionStore::append
//!                                   │
//!                 set_search_term ──┤ filtered view
//!                                   │
//!                 select ───────────┴─► RequestView (sync)
//!                                       resolve_body (async, ticketed)
//! ```
//!
//! The core never renders anything. Front ends read [`SessionStore::filtered_rows`]
//! and [`SessionStore::details`] and subscribe to [`SessionEvent`]s.

mod body;
mod classifier;
mod error;
mod exchange;
mod har;
mod params;
mod session;
mod view;

#[cfg(test)]
mod test_support;

pub use body::{BodyState, BodyView, PREVIEW_LIMIT, classify_body, resolve_body};
pub use classifier::{
    ClassifiedExchange, ExchangeId, STATIC_ASSET_EXTENSIONS, classify, is_static_asset,
};
pub use error::CoreError;
pub use exchange::{
    Content, ContentFetcher, FetchedContent, Header, NetworkExchange, PostData, Request, Response,
};
pub use har::{load_har, parse_har};
pub use params::{
    IMPORTANT_HEADERS, ParamValue, ParameterSet, extract_body_params, extract_important_headers,
    extract_query_params, flatten, format_as_lines,
};
pub use session::{BodyTicket, SessionEvent, SessionStore};
pub use view::{
    Details, ExchangeDetails, ExchangeKind, ExchangeRow, Payload, RequestView, UNKNOWN,
    display_name, format_size, kind_of, size_label,
};
