//! # Paramscope Config
//!
//! TOML configuration for the paramscope inspector: where to find Chrome's
//! debugging endpoint, which page to attach to, and how to log.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
