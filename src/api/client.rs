//! REST client glue
//!
//! Resolves configured APIs by name and prepares `reqwest` requests carrying
//! the headers from the endpoint's supplier. Sending, retrying and response
//! handling stay with the caller.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};

use crate::config::RootConfig;
use crate::error::ClientError;

/// Prepares requests against the endpoints of a [`RootConfig`]
#[derive(Debug, Clone)]
pub struct RestClient {
    config: Arc<RootConfig>,
    http: Client,
}

impl RestClient {
    pub fn new(config: Arc<RootConfig>) -> Self {
        Self::with_http_client(config, Client::new())
    }

    pub fn with_http_client(config: Arc<RootConfig>, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    /// Build a request to `path` on the API named `api_name`
    ///
    /// The endpoint's header supplier runs once per call. If it fails, no
    /// request is prepared.
    pub async fn request(
        &self,
        api_name: &str,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, ClientError> {
        let endpoint = self
            .config
            .endpoint(api_name)
            .ok_or_else(|| ClientError::UnknownApi(api_name.to_string()))?;
        let base = endpoint
            .endpoint()
            .ok_or_else(|| ClientError::MissingEndpoint(api_name.to_string()))?;

        let custom = endpoint.custom_header().headers().await?;

        let mut headers = HeaderMap::with_capacity(custom.len());
        for (name, value) in &custom {
            let invalid = || ClientError::InvalidHeader {
                api: api_name.to_string(),
                name: name.clone(),
            };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }

        let url = join_url(base, path);
        tracing::debug!(api = %api_name, method = %method, url = %url, "Prepared request");

        Ok(self.http.request(method, url).headers(headers))
    }

    pub async fn get(&self, api_name: &str, path: &str) -> Result<RequestBuilder, ClientError> {
        self.request(api_name, Method::GET, path).await
    }

    pub async fn post(&self, api_name: &str, path: &str) -> Result<RequestBuilder, ClientError> {
        self.request(api_name, Method::POST, path).await
    }

    pub async fn put(&self, api_name: &str, path: &str) -> Result<RequestBuilder, ClientError> {
        self.request(api_name, Method::PUT, path).await
    }

    pub async fn delete(&self, api_name: &str, path: &str) -> Result<RequestBuilder, ClientError> {
        self.request(api_name, Method::DELETE, path).await
    }
}

/// Join a base URL and a path with exactly one `/` between them
fn join_url(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path)
}
