//! Error handling module

mod types;

pub use types::{ClientError, ConfigError, SessionError, TokenError};
