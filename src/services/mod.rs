//! Business logic between the request layer and the database.

pub mod simulations;

pub use simulations::{
    calculate_and_store, delete, get, list, recalculate, stats, update, CalculationOutcome,
    StoredOutcome,
};
