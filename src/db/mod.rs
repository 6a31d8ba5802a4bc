//! Connection resolver: pick a database URL and build the shared pool.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup awaits `connect` once. The result is either a lazily-connecting
//! SQLx pool plus the query interface wrapped around it, or neither. Running
//! without a database is a supported state, not an error.
//!
//! PRECEDENCE
//! ==========
//! 1. `DATABASE_URL`, when non-empty, always wins. `LOCAL_DATABASE_URL` is
//!    not consulted even if the explicit value later fails pool construction.
//! 2. `LOCAL_DATABASE_URL`, only if it parses and its host is `localhost`
//!    or `127.0.0.1`. Anything else is silently treated as unset.
//! 3. Nothing.
//!
//! CONFIDENTIALITY
//! ===============
//! URLs carry credentials. Diagnostics name the source, never the value.
//! `DatabaseUrl` redacts itself in `Debug` and `Display`; the raw string is
//! only handed to the pool constructor.

pub mod query;

use std::fmt;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info, warn};
use url::Url;

use crate::env::{DATABASE_URL, DB_MAX_CONNECTIONS, EnvSnapshot, LOCAL_DATABASE_URL};
use crate::schema::Schema;

pub use query::Database;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

// =============================================================================
// ERROR
// =============================================================================

/// Fatal startup misconfiguration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The pool rejected a present URL. The driver error is kept as the
    /// source; the message itself never includes the URL.
    #[error("failed to construct database pool from {origin} URL")]
    PoolConstruction {
        origin: ResolvedSource,
        #[source]
        err: sqlx::Error,
    },
}

// =============================================================================
// RESOLVED SOURCE
// =============================================================================

/// Which configuration origin supplied the connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedSource {
    Explicit,
    LocalDev,
    None,
}

impl ResolvedSource {
    #[must_use]
    pub fn of(url: Option<&DatabaseUrl>) -> Self {
        url.map_or(Self::None, DatabaseUrl::source)
    }

    /// Name of the environment variable behind this source, if any.
    #[must_use]
    pub fn variable(self) -> Option<&'static str> {
        match self {
            Self::Explicit => Some(DATABASE_URL),
            Self::LocalDev => Some(LOCAL_DATABASE_URL),
            Self::None => None,
        }
    }
}

impl fmt::Display for ResolvedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "explicit",
            Self::LocalDev => "local-dev",
            Self::None => "none",
        })
    }
}

// =============================================================================
// DATABASE URL
// =============================================================================

/// A chosen connection string tagged with where it came from.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseUrl {
    source: ResolvedSource,
    raw: String,
}

impl DatabaseUrl {
    #[must_use]
    pub fn source(&self) -> ResolvedSource {
        self.source
    }

    /// The raw connection string. Pass it to a driver, never to a log.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseUrl")
            .field("source", &self.source)
            .field("raw", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} database URL>", self.source)
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Outcome of the precedence policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A usable URL was found.
    Chosen(DatabaseUrl),
    /// Only `LOCAL_DATABASE_URL` was set and it did not name a local host.
    LocalRejected,
    /// Neither variable was set.
    Unset,
}

impl Resolution {
    #[must_use]
    pub fn url(&self) -> Option<&DatabaseUrl> {
        match self {
            Self::Chosen(url) => Some(url),
            Self::LocalRejected | Self::Unset => None,
        }
    }

    #[must_use]
    pub fn into_url(self) -> Option<DatabaseUrl> {
        match self {
            Self::Chosen(url) => Some(url),
            Self::LocalRejected | Self::Unset => None,
        }
    }
}

/// Apply the precedence policy, keeping the reason when nothing is chosen.
///
/// Pure: the same snapshot always yields the same answer.
#[must_use]
pub fn resolve(env: &EnvSnapshot) -> Resolution {
    if let Some(explicit) = env.get(DATABASE_URL).filter(|v| !v.is_empty()) {
        return Resolution::Chosen(DatabaseUrl { source: ResolvedSource::Explicit, raw: explicit.to_owned() });
    }

    match env.get(LOCAL_DATABASE_URL) {
        Some(local) if is_local_url(local) => {
            Resolution::Chosen(DatabaseUrl { source: ResolvedSource::LocalDev, raw: local.to_owned() })
        }
        Some(_) => Resolution::LocalRejected,
        None => Resolution::Unset,
    }
}

/// The chosen URL, if any. See `resolve` for the reason when absent.
#[must_use]
pub fn resolve_connection_url(env: &EnvSnapshot) -> Option<DatabaseUrl> {
    resolve(env).into_url()
}

/// True when `raw` parses as a URL whose hostname is a loopback name.
#[must_use]
pub fn is_local_url(raw: &str) -> bool {
    Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(|h| LOCAL_HOSTS.contains(&h)))
        .unwrap_or(false)
}

// =============================================================================
// POOL SETTINGS
// =============================================================================

/// Options passed through to the pool. Connection behavior beyond this
/// belongs to SQLx.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
}

impl PoolSettings {
    #[must_use]
    pub fn from_env(env: &EnvSnapshot) -> Self {
        Self { max_connections: env.parse_or(DB_MAX_CONNECTIONS, DEFAULT_DB_MAX_CONNECTIONS) }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self { max_connections: DEFAULT_DB_MAX_CONNECTIONS }
    }
}

// =============================================================================
// HANDLES
// =============================================================================

/// The pool and query interface, both present or both absent.
#[derive(Clone)]
pub struct DbHandles {
    inner: Option<Database>,
    source: ResolvedSource,
}

impl DbHandles {
    #[must_use]
    pub fn absent() -> Self {
        Self { inner: None, source: ResolvedSource::None }
    }

    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.as_ref().map(Database::pool)
    }

    #[must_use]
    pub fn db(&self) -> Option<&Database> {
        self.inner.as_ref()
    }

    #[must_use]
    pub fn source(&self) -> ResolvedSource {
        self.source
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl fmt::Debug for DbHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbHandles")
            .field("source", &self.source)
            .field("configured", &self.is_configured())
            .finish()
    }
}

// =============================================================================
// INITIALIZATION
// =============================================================================

/// Build the pool and query interface for `url`, or report that none exist.
///
/// The pool connects lazily, so no network I/O happens here. A missing URL
/// yields absent handles and a warning, never an error.
///
/// # Errors
///
/// Returns `ConfigError::PoolConstruction` if SQLx rejects a present URL.
///
/// # Panics
///
/// The pool spawns its maintenance tasks on the current Tokio runtime, so the
/// returned future must be polled inside one.
#[allow(clippy::unused_async)]
pub async fn init_connection(
    url: Option<DatabaseUrl>,
    settings: &PoolSettings,
    schema: &'static Schema,
) -> Result<DbHandles, ConfigError> {
    let Some(url) = url else {
        warn!(source = %ResolvedSource::None, "no database URL configured; skipping initialization");
        warn!("pool and query handles will be absent");
        return Ok(DbHandles::absent());
    };

    let source = url.source();
    let variable = source.variable().unwrap_or_default();
    match source {
        ResolvedSource::Explicit => info!(%source, variable, "using explicit database URL"),
        ResolvedSource::LocalDev => info!(%source, variable, "using local-dev database URL"),
        ResolvedSource::None => {}
    }

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_lazy(url.expose())
        .map_err(|err| ConfigError::PoolConstruction { origin: source, err })?;

    Ok(DbHandles { inner: Some(Database::new(pool, schema)), source })
}

/// Resolve from `env` and initialize in one step.
///
/// # Errors
///
/// Propagates `ConfigError` from `init_connection`.
pub async fn connect(env: &EnvSnapshot, schema: &'static Schema) -> Result<DbHandles, ConfigError> {
    let resolution = resolve(env);
    if resolution == Resolution::LocalRejected {
        debug!(variable = LOCAL_DATABASE_URL, "ignored: not a local URL");
    }
    init_connection(resolution.into_url(), &PoolSettings::from_env(env), schema).await
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
