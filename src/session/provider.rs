//! Session provider seam
//!
//! The session lifecycle (sign-in, refresh, storage) belongs to the identity
//! client. This crate only asks it for the current session.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::token::IdToken;
use crate::error::SessionError;

/// The current authenticated user's tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id_token: IdToken,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl Session {
    pub fn new(id_token: IdToken) -> Self {
        Self {
            id_token,
            access_token: None,
            refresh_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    pub fn id_token(&self) -> &IdToken {
        &self.id_token
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Whether the ID token is still valid at `now`
    ///
    /// Tokens that cannot be decoded or carry no expiry are treated as invalid.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.id_token
            .expiration()
            .map(|exp| exp > now)
            .unwrap_or(false)
    }
}

/// Source of the current session
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Fetch the current session, or fail if no user is signed in
    async fn current_session(&self) -> Result<Session, SessionError>;
}

#[async_trait]
impl<P: SessionProvider + ?Sized> SessionProvider for Arc<P> {
    async fn current_session(&self) -> Result<Session, SessionError> {
        (**self).current_session().await
    }
}

/// A provider holding a fixed session, or none at all
///
/// Useful for command-line use and tests. It never refreshes anything.
#[derive(Debug, Clone, Default)]
pub struct StaticSessionProvider {
    session: Option<Session>,
}

impl StaticSessionProvider {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    /// A provider whose session carries only the given ID token
    pub fn with_id_token(jwt: impl Into<String>) -> Self {
        Self::new(Some(Session::new(IdToken::new(jwt))))
    }

    /// A provider with nobody signed in
    pub fn signed_out() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_session(&self) -> Result<Session, SessionError> {
        self.session.clone().ok_or(SessionError::NoCurrentUser)
    }
}
