//! Authorization header suppliers
//!
//! A header supplier is invoked by the REST client before every request to a
//! configured endpoint. The session-backed supplier asks the session provider
//! for the current session on each call and puts the encoded ID token in the
//! `Authorization` header as-is: no `Bearer ` scheme is prepended.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SessionError;
use crate::session::SessionProvider;

/// Name of the header carrying the ID token
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Extra headers for a single request, keyed by header name
pub type CustomHeaders = HashMap<String, String>;

/// Produces extra headers for an outgoing request
#[async_trait]
pub trait HeaderSupplier: Send + Sync {
    async fn headers(&self) -> Result<CustomHeaders, SessionError>;
}

/// Supplies `Authorization: <id token>` from the current session
///
/// Every call queries the provider again. Nothing is cached and concurrent
/// calls are not coalesced.
#[derive(Clone)]
pub struct SessionHeaderSupplier {
    sessions: Arc<dyn SessionProvider>,
}

impl SessionHeaderSupplier {
    pub fn new(sessions: Arc<dyn SessionProvider>) -> Self {
        Self { sessions }
    }
}

impl fmt::Debug for SessionHeaderSupplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHeaderSupplier").finish_non_exhaustive()
    }
}

#[async_trait]
impl HeaderSupplier for SessionHeaderSupplier {
    async fn headers(&self) -> Result<CustomHeaders, SessionError> {
        let session = self.sessions.current_session().await.map_err(|err| {
            tracing::debug!(error = %err, "No session for authorization header");
            err
        })?;

        let id_token = session.id_token();
        tracing::debug!(token = %id_token.preview(), "Attaching ID token");

        let mut headers = CustomHeaders::with_capacity(1);
        headers.insert(
            AUTHORIZATION_HEADER.to_string(),
            id_token.jwt_token().to_string(),
        );
        Ok(headers)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::session::{IdToken, Session};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Session provider stub that counts lookups
    pub(crate) struct CountingProvider {
        result: Result<Session, SessionError>,
        pub(crate) calls: AtomicUsize,
    }

    impl CountingProvider {
        pub(crate) fn with_token(jwt: &str) -> Self {
            Self {
                result: Ok(Session::new(IdToken::new(jwt))),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing(err: SessionError) -> Self {
            Self {
                result: Err(err),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionProvider for CountingProvider {
        async fn current_session(&self) -> Result<Session, SessionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn test_authorization_is_raw_token() {
        let provider = Arc::new(CountingProvider::with_token("abc.def.ghi"));
        let supplier = SessionHeaderSupplier::new(provider.clone());

        let headers = supplier.headers().await.unwrap();

        assert_eq!(headers.len(), 1);
        assert_eq!(headers["Authorization"], "abc.def.ghi");
        assert!(!headers["Authorization"].starts_with("Bearer "));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_session_error_propagates_unchanged() {
        for err in [
            SessionError::NoCurrentUser,
            SessionError::SessionExpired,
            SessionError::Provider("refresh token revoked".to_string()),
        ] {
            let supplier =
                SessionHeaderSupplier::new(Arc::new(CountingProvider::failing(err.clone())));
            assert_eq!(supplier.headers().await, Err(err));
        }
    }

    #[tokio::test]
    async fn test_concurrent_calls_each_query_provider() {
        let provider = Arc::new(CountingProvider::with_token("abc.def.ghi"));
        let supplier = SessionHeaderSupplier::new(provider.clone());

        let (a, b) = tokio::join!(supplier.headers(), supplier.headers());

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_sequential_calls_are_not_cached() {
        let provider = Arc::new(CountingProvider::with_token("t"));
        let supplier = SessionHeaderSupplier::new(provider.clone());

        for _ in 0..3 {
            supplier.headers().await.unwrap();
        }
        assert_eq!(provider.calls(), 3);
    }
}
