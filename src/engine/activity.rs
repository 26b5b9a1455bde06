//! Per-activity cost and revenue derivation.

use crate::normalize;
use crate::types::{ActivityInput, ActivityResult};

/// Derive the monthly figures for one activity.
///
/// Pure function over the (already normalized) input:
/// - instructor cost = hourly cost × weekly hours × weeks per month
/// - monthly cost    = instructor cost + material cost
/// - monthly revenue = enrolled × enrolled rate + external × external rate
///
/// An activity with zero participants still carries its full cost — that is
/// a legitimate loss-making state the caller surfaces, not an input error.
pub fn compute_activity(input: &ActivityInput) -> ActivityResult {
    // Guard against a snapshot built before the weeks default existed.
    let weeks = if input.weeks_per_month == 0.0 {
        normalize::default_weeks_per_month()
    } else {
        input.weeks_per_month
    };

    let monthly_instructor_cost = input.instructor_hourly_cost * input.weekly_hours * weeks;
    let monthly_cost = monthly_instructor_cost + input.monthly_material_cost;
    let monthly_revenue = f64::from(input.enrolled_participants) * input.rate_per_enrolled
        + f64::from(input.external_participants) * input.rate_per_external;
    let monthly_profit = monthly_revenue - monthly_cost;
    let profit_margin = if monthly_revenue > 0.0 {
        monthly_profit / monthly_revenue * 100.0
    } else {
        0.0
    };

    ActivityResult {
        activity: input.clone(),
        monthly_instructor_cost,
        monthly_cost,
        monthly_revenue,
        monthly_profit,
        profit_margin,
    }
}
