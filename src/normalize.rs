//! Input normalization boundary.
//!
//! The form layer favors "never block the user" over strict validation:
//! a missing, non-numeric, or negative value degrades to zero instead of
//! rejecting the submission. This module is the single place where that
//! policy lives — everything below it (the calculators) can assume clean,
//! non-negative numbers.
//!
//! Two entry points:
//! - the `lenient_*` serde deserializers, wired into the DTO fields in
//!   [`crate::types`], so raw JSON bodies coerce at the parse boundary;
//! - [`line_item`] / [`coerce_amount`] for callers holding already-parsed
//!   values.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{CostCategory, LineItem, LineItemInput};

/// Coerce an arbitrary JSON value to a non-negative amount.
///
/// Accepts a number or a numeric string; everything else — null, objects,
/// unparseable or negative values, non-finite floats — becomes 0.0. Never
/// errors.
pub fn coerce_amount(raw: &Value) -> f64 {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Coerce an arbitrary JSON value to a non-negative whole count.
pub fn coerce_count(raw: &Value) -> u32 {
    let amount = coerce_amount(raw);
    // Counts submitted as floats truncate, the way parseInt would.
    amount.trunc().min(f64::from(u32::MAX)) as u32
}

pub fn default_weeks_per_month() -> f64 {
    4.0
}

/// `weeksPerMonth` field policy: zero or unparseable falls back to 4, so a
/// blank field never silently erases instructor cost.
pub fn coerce_weeks(raw: &Value) -> f64 {
    let weeks = coerce_amount(raw);
    if weeks == 0.0 {
        default_weeks_per_month()
    } else {
        weeks
    }
}

pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&raw))
}

pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_count(&raw))
}

pub fn lenient_weeks<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_weeks(&raw))
}

/// Build a validated [`LineItem`] from a submitted entry.
///
/// The recurrence flag comes from the fixed category table, never from the
/// item itself: "monthly" categories are always recurring, investment
/// categories never are.
pub fn line_item(input: &LineItemInput) -> LineItem {
    let amount = if input.amount.is_finite() && input.amount > 0.0 {
        input.amount
    } else {
        0.0
    };
    LineItem {
        category: input.category,
        name: input.name.clone(),
        amount,
        is_recurring: input.category.is_recurring(),
    }
}

/// Normalize a whole submission batch.
pub fn line_items(inputs: &[LineItemInput]) -> Vec<LineItem> {
    inputs.iter().map(line_item).collect()
}
