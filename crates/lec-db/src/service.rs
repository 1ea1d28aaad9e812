//! Service layer over `LecternDb`.
//!
//! Repository methods live in `crate::repos` as `impl LecternService` blocks,
//! one module per table.

use crate::LecternDb;
use crate::error::DatabaseError;

pub struct LecternService {
    db: LecternDb,
}

impl LecternService {
    /// Open a local database at `db_path` (`":memory:"` for tests).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self::from_db(LecternDb::open_local(db_path).await?))
    }

    #[must_use]
    pub const fn from_db(db: LecternDb) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn db(&self) -> &LecternDb {
        &self.db
    }
}
