//! Environment snapshot and best-effort `.env` loading.
//!
//! DESIGN
//! ======
//! Startup reads the process environment exactly once into an `EnvSnapshot`
//! and hands that read-only map to the resolver. Keeping the snapshot as a
//! plain value lets the selection policy stay a pure function of its input.
//!
//! Values in the snapshot may carry credentials, so nothing here prints
//! them: `Debug` lists keys only and `LoadError` never echoes file content.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Explicit/production connection string. Always wins when non-empty.
pub const DATABASE_URL: &str = "DATABASE_URL";

/// Local-development connection string. Only accepted for a local host.
pub const LOCAL_DATABASE_URL: &str = "LOCAL_DATABASE_URL";

/// Upper bound on pooled connections.
pub const DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Read-only copy of environment variables taken at startup.
#[derive(Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    #[must_use]
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Build a snapshot from explicit key/value pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Parse `key` as `T`, falling back to `default` when unset or invalid.
    #[must_use]
    pub fn parse_or<T>(&self, key: &str, default: T) -> T
    where
        T: std::str::FromStr,
    {
        self.get(key)
            .and_then(|v| v.parse::<T>().ok())
            .unwrap_or(default)
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("EnvSnapshot").field("keys", &keys).finish()
    }
}

// =============================================================================
// .env LOADING
// =============================================================================

/// Why a `.env` file was not applied.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No `.env` file in the working directory or any ancestor.
    #[error("env file not found")]
    NotFound,

    /// A line could not be parsed. Only the offending character offset is kept.
    #[error("env file parse failed at offset {index}")]
    Parse { index: usize },

    /// The file exists but could not be read.
    #[error("env file read failed: {0:?}")]
    Io(std::io::ErrorKind),

    /// Any other loader failure.
    #[error("env file load failed")]
    Other,
}

impl From<dotenvy::Error> for LoadError {
    fn from(err: dotenvy::Error) -> Self {
        if err.not_found() {
            return Self::NotFound;
        }
        match err {
            dotenvy::Error::LineParse(_, index) => Self::Parse { index },
            dotenvy::Error::Io(io) => Self::Io(io.kind()),
            // `dotenvy::Error` is non-exhaustive.
            _ => Self::Other,
        }
    }
}

/// Populate the process environment from the nearest `.env` file.
///
/// Existing variables are never overridden. Callers treat failure as
/// non-fatal and carry on with whatever the environment already holds.
///
/// # Errors
///
/// Returns a `LoadError` when no file is found or it cannot be applied.
pub fn load_env_file() -> Result<PathBuf, LoadError> {
    Ok(dotenvy::dotenv()?)
}

/// Populate the process environment from a specific file.
///
/// # Errors
///
/// Returns a `LoadError` when the file is missing or malformed.
pub fn load_env_file_from(path: impl AsRef<Path>) -> Result<(), LoadError> {
    Ok(dotenvy::from_path(path)?)
}

#[cfg(test)]
#[path = "env_test.rs"]
mod tests;
