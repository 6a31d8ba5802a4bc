//! Static schema description handed to the query interface.
//!
//! Tables are declared once as `'static` data. Migrations live elsewhere;
//! this is metadata only.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
    pub primary_key: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl Table {
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn primary_key(&self) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.primary_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub tables: &'static [Table],
}

impl Schema {
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&'static Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

const fn col(name: &'static str, sql_type: &'static str, nullable: bool) -> Column {
    Column { name, sql_type, nullable, primary_key: false }
}

const fn pk(name: &'static str, sql_type: &'static str) -> Column {
    Column { name, sql_type, nullable: false, primary_key: true }
}

// =============================================================================
// APPLICATION TABLES
// =============================================================================

pub const USER: Table = Table {
    name: "user",
    columns: &[
        pk("id", "text"),
        col("age", "integer", true),
        col("username", "text", false),
        col("password_hash", "text", false),
    ],
};

pub const SESSION: Table = Table {
    name: "session",
    columns: &[
        pk("id", "text"),
        col("user_id", "text", false),
        col("expires_at", "timestamptz", false),
    ],
};

pub static SCHEMA: Schema = Schema { tables: &[USER, SESSION] };

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
