//! Configuration management module
//!
//! This module loads identity and endpoint configuration from environment
//! variables and .env files.

pub mod env;
pub mod settings;

pub use env::{DotenvFile, EnvSource, MapEnv, ProcessEnv};
pub use settings::{
    build_root_config, EndpointConfig, IdentityConfig, RootConfig, ENV_API_ENDPOINT,
    ENV_IDENTITY_POOL_ID, ENV_USER_POOL_CLIENT_ID, ENV_USER_POOL_ID, REGION, REST_API, REST_API_2,
};
