//! Environment sources
//!
//! The root configuration is a pure function of an [`EnvSource`]. Production
//! code reads the process environment; tests and embedders supply a map or a
//! specific `.env` file.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// A source of named, possibly absent, string values
pub trait EnvSource: Send + Sync {
    /// Look up a value by name. Absent names yield `None`.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads the process environment
///
/// A `.env` file in the working directory is loaded first if it exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ProcessEnv {
    /// Load a local `.env` file (if any) into the process environment
    pub fn load() -> Self {
        // Load .env file if it exists (ignored in production typically)
        match local_dotenv(dotenvy::dotenv()) {
            Ok(Some(path)) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env file"),
        }
        Self
    }
}

/// A missing `.env` is normal; anything else is worth reporting
fn local_dotenv(result: dotenvy::Result<PathBuf>) -> dotenvy::Result<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// In-memory environment, used for tests and for values read from a file
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    values: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Values parsed from a specific `.env` file, without touching the process
/// environment
#[derive(Debug, Clone)]
pub struct DotenvFile {
    values: MapEnv,
}

impl DotenvFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let to_err = |source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        let values = dotenvy::from_path_iter(path)
            .map_err(to_err)?
            .collect::<Result<MapEnv, _>>()
            .map_err(to_err)?;

        tracing::debug!(path = %path.display(), count = values.len(), "Read env file");

        Ok(Self { values })
    }
}

impl EnvSource for DotenvFile {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key)
    }
}
