//! Identity and endpoint configuration
//!
//! [`build_root_config`] turns environment values into the configuration
//! consumed by the identity and REST clients at startup. Absent values pass
//! through as `None` and nothing is validated, so building never fails.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::env::EnvSource;
use crate::auth::{HeaderSupplier, SessionHeaderSupplier};
use crate::error::ConfigError;
use crate::session::SessionProvider;

/// Region of the identity and user pools
pub const REGION: &str = "ap-northeast-1";

/// Environment variable holding the identity pool id
pub const ENV_IDENTITY_POOL_ID: &str = "VUE_APP_COGNITO_IDENTITY_ID";
/// Environment variable holding the user pool id
pub const ENV_USER_POOL_ID: &str = "VUE_APP_COGNITO_USER_POOL_ID";
/// Environment variable holding the user pool app client id
pub const ENV_USER_POOL_CLIENT_ID: &str = "VUE_APP_COGNITO_CLIENT_ID";
/// Environment variable holding the REST API base URL
pub const ENV_API_ENDPOINT: &str = "VUE_APP_API_ENDPOINT";

/// Name of the primary REST API
pub const REST_API: &str = "rest-api";
/// Name of the secondary REST API (same backend as [`REST_API`])
pub const REST_API_2: &str = "rest-api-2";

/// Identity pool and user pool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    identity_pool_id: Option<String>,
    region: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_pool_id: Option<String>,
    #[serde(
        rename = "userPoolWebClientId",
        skip_serializing_if = "Option::is_none"
    )]
    user_pool_client_id: Option<String>,
}

impl IdentityConfig {
    pub fn new(
        identity_pool_id: Option<String>,
        user_pool_id: Option<String>,
        user_pool_client_id: Option<String>,
    ) -> Self {
        Self {
            identity_pool_id,
            region: REGION,
            user_pool_id,
            user_pool_client_id,
        }
    }

    pub fn identity_pool_id(&self) -> Option<&str> {
        self.identity_pool_id.as_deref()
    }

    /// Always [`REGION`]
    pub fn region(&self) -> &'static str {
        self.region
    }

    pub fn user_pool_id(&self) -> Option<&str> {
        self.user_pool_id.as_deref()
    }

    pub fn user_pool_client_id(&self) -> Option<&str> {
        self.user_pool_client_id.as_deref()
    }
}

/// A named REST endpoint and the supplier of its per-request headers
#[derive(Clone)]
pub struct EndpointConfig {
    name: String,
    endpoint: Option<String>,
    custom_header: Arc<dyn HeaderSupplier>,
}

impl EndpointConfig {
    pub fn new(
        name: impl Into<String>,
        endpoint: Option<String>,
        custom_header: Arc<dyn HeaderSupplier>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint,
            custom_header,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base URL, if one was configured
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn custom_header(&self) -> &dyn HeaderSupplier {
        self.custom_header.as_ref()
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

// The header supplier is behaviour, not data, and is left out.
impl Serialize for EndpointConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.endpoint.is_some() { 2 } else { 1 };
        let mut state = serializer.serialize_struct("EndpointConfig", len)?;
        state.serialize_field("name", &self.name)?;
        if let Some(endpoint) = &self.endpoint {
            state.serialize_field("endpoint", endpoint)?;
        }
        state.end()
    }
}

/// Everything the identity and REST clients need at startup
#[derive(Debug, Clone)]
pub struct RootConfig {
    identity: IdentityConfig,
    endpoints: Vec<EndpointConfig>,
}

#[derive(Serialize)]
struct ApiSection<'a> {
    endpoints: &'a [EndpointConfig],
}

impl Serialize for RootConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RootConfig", 2)?;
        state.serialize_field("Auth", &self.identity)?;
        state.serialize_field(
            "API",
            &ApiSection {
                endpoints: &self.endpoints,
            },
        )?;
        state.end()
    }
}

impl RootConfig {
    /// Assemble a configuration, rejecting endpoints that share a name
    pub fn new(
        identity: IdentityConfig,
        endpoints: Vec<EndpointConfig>,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(endpoints.len());
        if let Some(dup) = endpoints.iter().find(|e| !seen.insert(e.name.as_str())) {
            return Err(ConfigError::DuplicateEndpoint(dup.name.clone()));
        }

        Ok(Self {
            identity,
            endpoints,
        })
    }

    pub fn identity(&self) -> &IdentityConfig {
        &self.identity
    }

    /// Endpoints in declaration order
    pub fn endpoints(&self) -> &[EndpointConfig] {
        &self.endpoints
    }

    /// Look up an endpoint by name
    pub fn endpoint(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.iter().find(|e| e.name == name)
    }
}

/// Build the root configuration from environment values
///
/// Both REST APIs point at the same base URL and get their own
/// session-backed header supplier.
pub fn build_root_config(env: &dyn EnvSource, sessions: Arc<dyn SessionProvider>) -> RootConfig {
    let identity = IdentityConfig::new(
        env.get(ENV_IDENTITY_POOL_ID),
        env.get(ENV_USER_POOL_ID),
        env.get(ENV_USER_POOL_CLIENT_ID),
    );

    let api_endpoint = env.get(ENV_API_ENDPOINT);
    let endpoints = [REST_API, REST_API_2]
        .into_iter()
        .map(|name| {
            EndpointConfig::new(
                name,
                api_endpoint.clone(),
                Arc::new(SessionHeaderSupplier::new(sessions.clone())),
            )
        })
        .collect();

    tracing::info!(
        region = REGION,
        user_pool_id = ?identity.user_pool_id(),
        identity_pool_id = ?identity.identity_pool_id(),
        api_endpoint = ?api_endpoint,
        "Built endpoint configuration"
    );

    // Names are fixed and distinct, no check needed
    RootConfig {
        identity,
        endpoints,
    }
}
