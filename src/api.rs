//! Calculation-request interface.
//!
//! Typed entry points over [`AppState`], one per operation, each returning a
//! serializable response. Calculation responses are tagged by persistence
//! outcome because a storage failure does not void the computed figures.

use serde::Serialize;

use crate::advisor::AdvisoryReport;
use crate::db::{DashboardStats, SimulationRecord, SimulationSummary};
use crate::error::ApiError;
use crate::services;
use crate::state::AppState;
use crate::types::{ActivityResult, Indicators, SimulationInput, SimulationPatch};

/// Response to a calculate request.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CalculateResult {
    /// Snapshot computed and stored.
    Saved {
        id: i64,
        name: String,
        indicators: Indicators,
        activities: Vec<ActivityResult>,
        advisory: AdvisoryReport,
    },
    /// Snapshot computed but not stored. The figures remain usable.
    Unsaved {
        name: String,
        indicators: Indicators,
        activities: Vec<ActivityResult>,
        advisory: AdvisoryReport,
        #[serde(rename = "persistenceError")]
        persistence_error: String,
    },
}

/// Compute a simulation, store it if possible.
pub fn calculate(state: &AppState, input: SimulationInput) -> CalculateResult {
    let outcome = services::calculate_and_store(state, input);
    match outcome.id {
        Some(id) => CalculateResult::Saved {
            id,
            name: outcome.input.name,
            indicators: outcome.indicators,
            activities: outcome.activities,
            advisory: outcome.advisory,
        },
        None => CalculateResult::Unsaved {
            name: outcome.input.name,
            indicators: outcome.indicators,
            activities: outcome.activities,
            advisory: outcome.advisory,
            persistence_error: outcome
                .persistence_error
                .unwrap_or_else(|| "Unknown persistence failure".to_string()),
        },
    }
}

/// Replace a stored simulation with a full new input set.
pub fn update(
    state: &AppState,
    id: i64,
    input: SimulationInput,
) -> Result<CalculateResult, ApiError> {
    let outcome = services::update(state, id, input).map_err(|e| ApiError::from(&e))?;
    Ok(saved(outcome))
}

/// Re-run a stored simulation with a partial override.
pub fn recalculate(
    state: &AppState,
    id: i64,
    patch: SimulationPatch,
) -> Result<CalculateResult, ApiError> {
    let outcome = services::recalculate(state, id, &patch).map_err(|e| ApiError::from(&e))?;
    Ok(saved(outcome))
}

fn saved(outcome: services::StoredOutcome) -> CalculateResult {
    CalculateResult::Saved {
        id: outcome.id,
        name: outcome.input.name,
        indicators: outcome.indicators,
        activities: outcome.activities,
        advisory: outcome.advisory,
    }
}

pub fn get(state: &AppState, id: i64) -> Result<SimulationRecord, ApiError> {
    services::get(state, id).map_err(|e| ApiError::from(&e))
}

pub fn list(state: &AppState, limit: u32) -> Result<Vec<SimulationSummary>, ApiError> {
    services::list(state, limit).map_err(|e| ApiError::from(&e))
}

pub fn delete(state: &AppState, id: i64) -> Result<(), ApiError> {
    services::delete(state, id).map_err(|e| ApiError::from(&e))
}

pub fn stats(state: &AppState) -> Result<DashboardStats, ApiError> {
    services::stats(state).map_err(|e| ApiError::from(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::test_utils::test_db;
    use crate::types::{ActivityInput, Segment};

    fn test_state() -> AppState {
        AppState::with_db(AppConfig::default(), test_db())
    }

    fn sample_input() -> SimulationInput {
        SimulationInput {
            name: "Api plan".into(),
            analysis_horizon_months: 24,
            activities: vec![ActivityInput {
                segment: Segment::Primary,
                name: "Chess club".into(),
                instructor_hourly_cost: 50.0,
                weekly_hours: 4.0,
                weeks_per_month: 4.0,
                monthly_material_cost: 100.0,
                enrolled_participants: 10,
                external_participants: 5,
                rate_per_enrolled: 150.0,
                rate_per_external: 200.0,
            }],
            line_items: Vec::new(),
        }
    }

    #[test]
    fn calculate_serializes_with_saved_tag() {
        let state = test_state();
        let result = calculate(&state, sample_input());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "saved");
        assert_eq!(json["indicators"]["monthlyProfit"], 1_600.0);
        assert!(json["advisory"]["analysis"].is_string());
    }

    #[test]
    fn calculate_without_database_uses_unsaved_tag() {
        let state = AppState {
            config: AppConfig::default(),
            db: std::sync::Mutex::new(None),
        };
        let result = calculate(&state, sample_input());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "unsaved");
        assert!(json["persistenceError"].is_string());
        assert_eq!(json["indicators"]["monthlyRevenue"], 2_500.0);
    }

    #[test]
    fn get_missing_maps_to_404() {
        let state = test_state();
        let err = get(&state, 9).unwrap_err();
        assert_eq!(err.status, 404);
    }

    #[test]
    fn recalculate_missing_maps_to_400() {
        let state = test_state();
        let err = recalculate(&state, 9, SimulationPatch::default()).unwrap_err();
        assert_eq!(err.status, 400);
    }
}
