//! Simulation lifecycle: compute, advise, persist.
//!
//! Calculation never fails on persistence problems. When the database is
//! unavailable the outcome carries the computed figures plus the error text,
//! and the caller decides how to present the degraded result.

use crate::advisor::{self, AdvisoryReport};
use crate::db::{DashboardStats, SimulationRecord, SimulationSummary};
use crate::error::AppError;
use crate::state::AppState;
use crate::types::{ActivityResult, Indicators, SimulationInput, SimulationPatch};

/// Result of a calculate request. `id` is present only when the snapshot was
/// stored; otherwise `persistence_error` says why it was not.
#[derive(Debug)]
pub struct CalculationOutcome {
    pub id: Option<i64>,
    pub input: SimulationInput,
    pub indicators: Indicators,
    pub activities: Vec<ActivityResult>,
    pub advisory: AdvisoryReport,
    pub persistence_error: Option<String>,
}

/// Result of an update or recalculation, always backed by a stored row.
#[derive(Debug)]
pub struct StoredOutcome {
    pub id: i64,
    pub input: SimulationInput,
    pub indicators: Indicators,
    pub activities: Vec<ActivityResult>,
    pub advisory: AdvisoryReport,
}

fn compute(
    state: &AppState,
    input: &SimulationInput,
) -> (Indicators, Vec<ActivityResult>, AdvisoryReport) {
    let (indicators, activities) = crate::engine::compute_indicators(
        &input.activities,
        &input.line_items,
        input.analysis_horizon_months,
    );
    let advisory = advisor::generate(&state.config.advisory, &indicators, &activities);
    (indicators, activities, advisory)
}

/// Compute a simulation and store the snapshot, degrading to an unsaved
/// result if persistence fails.
pub fn calculate_and_store(state: &AppState, input: SimulationInput) -> CalculationOutcome {
    let (indicators, activities, advisory) = compute(state, &input);

    let stored = state.db(|db| {
        Ok(db.create_simulation(&input, &indicators, &activities, Some(&advisory))?)
    });

    let (id, persistence_error) = match stored {
        Ok(id) => (Some(id), None),
        Err(e) => {
            log::warn!("Computed simulation could not be stored: {e}");
            (None, Some(e.to_string()))
        }
    };

    CalculationOutcome {
        id,
        input,
        indicators,
        activities,
        advisory,
        persistence_error,
    }
}

/// Re-run a stored simulation with a partial override, persisting the result
/// back to the same row.
pub fn recalculate(state: &AppState, id: i64, patch: &SimulationPatch) -> Result<StoredOutcome, AppError> {
    let prior = state
        .db(|db| Ok(db.get_simulation(id)?))?
        .ok_or(AppError::NoPriorSimulation(id))?;

    let input = patch.apply(&prior.input);
    store_over(state, id, input)
}

/// Replace a stored simulation with a full new input.
pub fn update(state: &AppState, id: i64, input: SimulationInput) -> Result<StoredOutcome, AppError> {
    store_over(state, id, input)
}

fn store_over(state: &AppState, id: i64, input: SimulationInput) -> Result<StoredOutcome, AppError> {
    let (indicators, activities, advisory) = compute(state, &input);

    let found = state.db(|db| {
        Ok(db.update_simulation(id, &input, &indicators, &activities, Some(&advisory))?)
    })?;
    if !found {
        return Err(AppError::NotFound(id));
    }

    Ok(StoredOutcome {
        id,
        input,
        indicators,
        activities,
        advisory,
    })
}

pub fn get(state: &AppState, id: i64) -> Result<SimulationRecord, AppError> {
    state
        .db(|db| Ok(db.get_simulation(id)?))?
        .ok_or(AppError::NotFound(id))
}

pub fn list(state: &AppState, limit: u32) -> Result<Vec<SimulationSummary>, AppError> {
    state.db(|db| Ok(db.list_simulations(limit)?))
}

pub fn delete(state: &AppState, id: i64) -> Result<(), AppError> {
    let deleted = state.db(|db| Ok(db.delete_simulation(id)?))?;
    if !deleted {
        return Err(AppError::NotFound(id));
    }
    Ok(())
}

pub fn stats(state: &AppState) -> Result<DashboardStats, AppError> {
    state.db(|db| Ok(db.dashboard_stats()?))
}
