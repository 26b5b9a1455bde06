//! Error types for the simulation service layer.
//!
//! The taxonomy is intentionally small because computation below the
//! normalizer boundary cannot fail: malformed numeric input degrades to
//! zero by policy, so only lookup and persistence conditions ever surface
//! to a caller. Advisory failures are handled inside the advisor module
//! and never appear here.

use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum AppError {
    /// The requested simulation id does not exist (404-equivalent).
    #[error("Simulation {0} not found")]
    NotFound(i64),

    /// A recalculation arrived with no base snapshot to merge against
    /// (400-equivalent). The caller must perform a full calculation first.
    #[error("No prior simulation with id {0} to recalculate")]
    NoPriorSimulation(i64),

    /// The storage layer could not complete a read or write
    /// (500-equivalent). Carries the underlying message.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] DbError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP-equivalent status for the presentation layer.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::NoPriorSimulation(_) => 400,
            AppError::Persistence(_) | AppError::Config(_) => 500,
        }
    }

    /// True when retrying without changing the request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Persistence(_))
    }
}

/// Serializable error representation for the presentation layer.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    pub kind: ErrorKind,
    pub status: u16,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    NotFound,
    NoPriorSimulation,
    Persistence,
    Config,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        let kind = match err {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::NoPriorSimulation(_) => ErrorKind::NoPriorSimulation,
            AppError::Persistence(_) => ErrorKind::Persistence,
            AppError::Config(_) => ErrorKind::Config,
        };
        ApiError {
            message: err.to_string(),
            kind,
            status: err.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_classes() {
        assert_eq!(AppError::NotFound(3).status_code(), 404);
        assert_eq!(AppError::NoPriorSimulation(3).status_code(), 400);
        assert_eq!(AppError::Config("bad".into()).status_code(), 500);
    }

    #[test]
    fn api_error_mirrors_app_error() {
        let err = AppError::NotFound(7);
        let api = ApiError::from(&err);
        assert_eq!(api.status, 404);
        assert!(api.message.contains('7'));
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["kind"], "notFound");
    }
}
