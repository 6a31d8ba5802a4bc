//! Startup database wiring: choose a connection URL, build one shared pool.
//!
//! `env` snapshots configuration, `db` resolves and initializes, `state`
//! carries the result to the rest of the application.

pub mod db;
pub mod env;
pub mod schema;
pub mod state;

pub use db::{ConfigError, Database, DbHandles, ResolvedSource, connect};
pub use schema::*;
pub use state::AppState;
