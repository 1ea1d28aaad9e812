//! # lec-db
//!
//! libSQL persistence for Lectern.
//!
//! Stores the authoritative copy of every student's lesson files together
//! with append-only compilation and test result history. The on-disk
//! workspace is rebuilt from these rows before each toolchain run.
//!
//! Uses the embedded `libsql` crate in local-only mode; `":memory:"` is
//! accepted for tests.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
mod test_support;

use error::DatabaseError;
use libsql::Builder;

pub use repos::compilation::NewCompilation;
pub use repos::source_file::{NewSourceFile, PersistedFiles};
pub use repos::test_result::NewTestResult;
pub use service::LecternService;

/// Database handle: one libSQL database and its connection.
pub struct LecternDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LecternDb {
    /// Open (or create) a local database and apply migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite; cascades depend on them.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let lectern_db = Self { db, conn };
        lectern_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(lectern_db)
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL, e.g. `"prg-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
