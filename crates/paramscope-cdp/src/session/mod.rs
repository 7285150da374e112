//! CDP page session for observing a single page.

mod core;
mod network;

pub use self::core::PageSession;
