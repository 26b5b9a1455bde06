//! Shared type definitions for the database layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::advisor::AdvisoryReport;
use crate::types::{ActivityResult, Indicators, SimulationInput};

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    #[error("Stored payload could not be encoded/decoded: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Everything persisted in a simulation row's opaque `payload` column:
/// the raw input snapshot plus the computed indicators and per-activity
/// results. Indicators are cached output, never independently mutable —
/// an update replaces the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    pub input: SimulationInput,
    pub indicators: Indicators,
    pub activities: Vec<ActivityResult>,
}

/// A fully hydrated stored simulation, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRecord {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub input: SimulationInput,
    pub indicators: Indicators,
    pub activities: Vec<ActivityResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<AdvisoryReport>,
}

/// Indexed summary columns used for listing and sorting, without the
/// payload blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub total_participants: u32,
    pub investment_total: f64,
    pub monthly_revenue: f64,
    pub monthly_profit: f64,
    pub profit_margin: f64,
    pub roi_percent: f64,
    pub payback_months: f64,
}

/// Aggregate figures across every stored simulation, for the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub simulation_count: i64,
    pub avg_roi_percent: f64,
    pub avg_payback_months: f64,
}
