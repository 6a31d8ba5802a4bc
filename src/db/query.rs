//! Query interface handle: the shared pool paired with schema metadata.

use sqlx::PgPool;

use crate::schema::{Schema, Table};

/// Façade handed to query code. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    schema: &'static Schema,
}

impl Database {
    #[must_use]
    pub fn new(pool: PgPool, schema: &'static Schema) -> Self {
        Self { pool, schema }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[must_use]
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    #[must_use]
    pub fn table(&self, name: &str) -> Option<&'static Table> {
        self.schema.table(name)
    }

    /// Round-trip a trivial query to confirm the pool can reach the server.
    /// Startup never calls this; it is for health checks that want one.
    ///
    /// # Errors
    ///
    /// Returns the driver error if no connection can be acquired.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
