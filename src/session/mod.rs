//! Sessions and identity tokens
//!
//! The types the authorization headers are derived from.

pub mod provider;
pub mod token;

pub use provider::{Session, SessionProvider, StaticSessionProvider};
pub use token::{IdToken, IdTokenClaims};
