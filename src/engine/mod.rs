//! The financial calculation engine.
//!
//! Three pure layers, leaves first: per-activity derivation
//! ([`activity::compute_activity`]), cost-category aggregation
//! ([`costs::aggregate`]), and the aggregate indicator set
//! ([`indicators::compute_indicators`]). No I/O, no hidden state —
//! identical inputs always yield identical outputs, which is what lets the
//! recalculation path rerun the whole pipeline on every edit instead of
//! patching cached results.

pub mod activity;
pub mod costs;
pub mod indicators;

pub use activity::compute_activity;
pub use costs::{aggregate, CostBreakdown};
pub use indicators::compute_indicators;
