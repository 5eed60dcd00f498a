//! Cognito identity and REST endpoint configuration
//!
//! Builds the identity/user pool settings and the named REST endpoints from
//! environment values, and derives a per-request `Authorization` header from
//! the current session's ID token.

// Public modules
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use api::RestClient;
pub use auth::{HeaderSupplier, SessionHeaderSupplier};
pub use config::{build_root_config, RootConfig};
pub use error::SessionError;
pub use session::{Session, SessionProvider};
