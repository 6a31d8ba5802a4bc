//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is built once at startup from the resolved database handles
//! and cloned into every consumer. There are no module-level globals: code
//! that needs the database receives it through this struct.

use sqlx::PgPool;

use crate::db::{Database, DbHandles};

/// Startup context handed to the rest of the application.
/// Clone is cheap: the pool is reference-counted internally.
#[derive(Clone, Debug)]
pub struct AppState {
    db: DbHandles,
}

impl AppState {
    #[must_use]
    pub fn new(db: DbHandles) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn handles(&self) -> &DbHandles {
        &self.db
    }

    #[must_use]
    pub fn db(&self) -> Option<&Database> {
        self.db.db()
    }

    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.db.pool()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
