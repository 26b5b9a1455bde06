//! SQLite-backed persistence for simulations.
//!
//! The database lives at `~/.eduplan/eduplan.db`. Each simulation is stored
//! as whole-row state: a handful of indexed summary columns for listing plus
//! an opaque JSON payload carrying the full input snapshot and its computed
//! indicators. Writes (create, full-snapshot update, delete) run inside a
//! single transaction per simulation id, so no reader ever observes a
//! half-written snapshot. There is no partial-row update path — the service
//! layer always regenerates the complete payload.

use std::path::PathBuf;

use rusqlite::Connection;

pub mod types;
pub use types::*;

pub mod simulations;

pub struct PlanDb {
    conn: Connection,
}

impl PlanDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Self) -> Result<T, DbError>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(val) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Open (or create) the database at `~/.eduplan/eduplan.db` and apply
    /// the schema.
    pub fn open() -> Result<Self, DbError> {
        Self::open_at(Self::db_path()?)
    }

    /// Open a database at an explicit path. Useful for testing and for the
    /// `databasePath` config override.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // WAL for better concurrent read behavior while a write is in flight.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        // Cascade from simulations to their activities relies on FK
        // enforcement being on.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.eduplan/eduplan.db`.
    fn db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".eduplan").join("eduplan.db"))
    }
}

// =============================================================================
// Shared test utilities
// =============================================================================


#[cfg(test)]
mod tests {
    use super::test_utils::test_db;
    use super::*;

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM simulations", [], |row| row.get(0))
            .expect("simulations table should exist");
        assert_eq!(count, 0);

        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM simulation_activities", [], |row| {
                row.get(0)
            })
            .expect("simulation_activities table should exist");
        assert_eq!(count, 0);
    }

    #[test]
    fn idempotent_schema_application() {
        // Opening the same DB twice should not error.
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("idempotent.db");

        let _db1 = PlanDb::open_at(path.clone()).expect("first open");
        let _db2 = PlanDb::open_at(path).expect("second open should not fail");
    }

    #[test]
    fn transaction_rolls_back_on_error() {
        let db = test_db();
        let result: Result<(), DbError> = db.with_transaction(|db| {
            db.conn_ref().execute(
                "INSERT INTO simulations (name, created_at, updated_at, payload)
                 VALUES ('doomed', '2026-01-01', '2026-01-01', '{}')",
                [],
            )?;
            Err(DbError::Migration("forced failure".into()))
        });
        assert!(result.is_err());

        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM simulations", [], |row| row.get(0))
            .expect("query");
        assert_eq!(count, 0, "rolled-back insert must not persist");
    }
}
