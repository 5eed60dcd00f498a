//! Error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a session provider when no usable session exists.
///
/// Header suppliers hand these back to their caller untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No current user")]
    NoCurrentUser,

    #[error("Session expired")]
    SessionExpired,

    #[error("Session provider error: {0}")]
    Provider(String),
}

/// Errors decoding the claims of an ID token
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Malformed ID token: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
}

/// Errors loading configuration sources
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Endpoint name '{0}' is configured more than once")]
    DuplicateEndpoint(String),
}

/// Errors preparing a request against a configured endpoint
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("No API named '{0}' is configured")]
    UnknownApi(String),

    #[error("API '{0}' has no endpoint URL configured")]
    MissingEndpoint(String),

    #[error("Invalid header for API '{api}': {name}")]
    InvalidHeader { api: String, name: String },

    #[error(transparent)]
    Session(#[from] SessionError),
}
