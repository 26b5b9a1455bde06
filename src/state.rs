//! Shared application state.

use std::sync::Mutex;

use crate::config::AppConfig;
use crate::db::PlanDb;
use crate::error::AppError;

/// State threaded through the request layer.
///
/// The database is optional: if it cannot be opened the app still computes
/// simulations, it just cannot persist them.
pub struct AppState {
    pub config: AppConfig,
    pub db: Mutex<Option<PlanDb>>,
}

impl AppState {
    pub fn new() -> Self {
        let config = AppConfig::load();

        let open_result = match config.database_path.clone() {
            Some(path) => PlanDb::open_at(path),
            None => PlanDb::open(),
        };
        let db = match open_result {
            Ok(db) => Some(db),
            Err(e) => {
                log::warn!("Failed to open simulations database: {e}. Persistence disabled.");
                None
            }
        };

        Self {
            config,
            db: Mutex::new(db),
        }
    }

    /// Build a state around an already-open database. Used by tests.
    pub fn with_db(config: AppConfig, db: PlanDb) -> Self {
        Self {
            config,
            db: Mutex::new(Some(db)),
        }
    }

    /// Run `f` against the database, mapping poisoned-lock and missing-db
    /// cases to a persistence error.
    pub fn db<T>(&self, f: impl FnOnce(&PlanDb) -> Result<T, AppError>) -> Result<T, AppError> {
        let guard = self
            .db
            .lock()
            .map_err(|_| AppError::Config("Database lock poisoned".to_string()))?;
        match guard.as_ref() {
            Some(db) => f(db),
            None => Err(AppError::Config("Database is not available".to_string())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
