//! Shared DTOs for the simulation core.
//!
//! Everything the presentation layer sends or receives is defined here as a
//! typed, camelCase-serialized struct. Raw form payloads are loosely typed on
//! the wire (numbers arrive as strings, fields go missing), so the numeric
//! fields deserialize through the lenient helpers in [`crate::normalize`]
//! instead of failing the whole request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::normalize;

/// School level a given activity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    EarlyChildhood,
    Primary,
    LowerSecondary,
    UpperSecondary,
}

impl Segment {
    pub const ALL: [Segment; 4] = [
        Segment::EarlyChildhood,
        Segment::Primary,
        Segment::LowerSecondary,
        Segment::UpperSecondary,
    ];

    /// Human-readable label, used in advisory prompts and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Segment::EarlyChildhood => "Early childhood",
            Segment::Primary => "Primary",
            Segment::LowerSecondary => "Lower secondary",
            Segment::UpperSecondary => "Upper secondary",
        }
    }

    /// Wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::EarlyChildhood => "early-childhood",
            Segment::Primary => "primary",
            Segment::LowerSecondary => "lower-secondary",
            Segment::UpperSecondary => "upper-secondary",
        }
    }
}

/// Closed set of cost categories a line item can belong to.
///
/// Recurrence is a property of the category, not of the individual item: a
/// "monthly fixed" entry is always a monthly operating cost, an "initial
/// investment" entry never is. Marketing and human-resources buckets count
/// toward one-time investment, matching the behavior of the form this engine
/// was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostCategory {
    InitialInvestment,
    MonthlyFixed,
    MonthlyVariable,
    Marketing,
    HumanResources,
}

impl CostCategory {
    pub const ALL: [CostCategory; 5] = [
        CostCategory::InitialInvestment,
        CostCategory::MonthlyFixed,
        CostCategory::MonthlyVariable,
        CostCategory::Marketing,
        CostCategory::HumanResources,
    ];

    /// Fixed category-to-recurrence table. True means the amount is a monthly
    /// operating cost; false means one-time investment.
    pub fn is_recurring(&self) -> bool {
        matches!(
            self,
            CostCategory::MonthlyFixed | CostCategory::MonthlyVariable
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            CostCategory::InitialInvestment => "Initial investment",
            CostCategory::MonthlyFixed => "Monthly fixed costs",
            CostCategory::MonthlyVariable => "Monthly variable costs",
            CostCategory::Marketing => "Marketing",
            CostCategory::HumanResources => "Human resources",
        }
    }
}

/// A raw cost/revenue entry as submitted by the form.
///
/// `amount` deserializes leniently — null, missing, a numeric string, or a
/// negative number all coerce to 0.0 rather than rejecting the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub category: CostCategory,
    pub name: String,
    #[serde(default, deserialize_with = "normalize::lenient_amount")]
    pub amount: f64,
}

/// A validated cost/revenue entry. Immutable once part of a snapshot; edits
/// produce a fresh item via [`crate::normalize::line_item`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub category: CostCategory,
    pub name: String,
    pub amount: f64,
    pub is_recurring: bool,
}

/// One extracurricular offering, as submitted.
///
/// All counts and rates clamp to non-negative on deserialization.
/// `weeksPerMonth` defaults to 4 when absent or zero so a half-filled form
/// never silently zeroes out instructor cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    pub segment: Segment,
    pub name: String,
    #[serde(default, deserialize_with = "normalize::lenient_amount")]
    pub instructor_hourly_cost: f64,
    #[serde(default, deserialize_with = "normalize::lenient_amount")]
    pub weekly_hours: f64,
    #[serde(
        default = "normalize::default_weeks_per_month",
        deserialize_with = "normalize::lenient_weeks"
    )]
    pub weeks_per_month: f64,
    #[serde(default, deserialize_with = "normalize::lenient_amount")]
    pub monthly_material_cost: f64,
    /// The school's own students enrolled in this activity.
    #[serde(default, deserialize_with = "normalize::lenient_count")]
    pub enrolled_participants: u32,
    /// Participants not enrolled at the school.
    #[serde(default, deserialize_with = "normalize::lenient_count")]
    pub external_participants: u32,
    #[serde(default, deserialize_with = "normalize::lenient_amount")]
    pub rate_per_enrolled: f64,
    #[serde(default, deserialize_with = "normalize::lenient_amount")]
    pub rate_per_external: f64,
}

/// An activity plus its derived monthly figures. Never stored as independent
/// state — recomputed from the input on every calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResult {
    #[serde(flatten)]
    pub activity: ActivityInput,
    pub monthly_instructor_cost: f64,
    pub monthly_cost: f64,
    pub monthly_revenue: f64,
    pub monthly_profit: f64,
    /// Per-activity margin, 0.0 when the activity has no revenue.
    pub profit_margin: f64,
}

fn default_name() -> String {
    "Untitled plan".to_string()
}

fn default_horizon() -> u32 {
    24
}

/// Full calculation request body (`POST /calculate`, `PUT /simulations/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_horizon")]
    pub analysis_horizon_months: u32,
    #[serde(default)]
    pub activities: Vec<ActivityInput>,
    #[serde(default)]
    pub line_items: Vec<LineItemInput>,
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            name: default_name(),
            analysis_horizon_months: default_horizon(),
            activities: Vec::new(),
            line_items: Vec::new(),
        }
    }
}

/// Partial edit applied on top of a stored snapshot.
///
/// Shallow merge semantics: a field present here fully replaces the stored
/// field; an absent field keeps its prior value. There is no per-activity
/// patching — `activities`, when present, is the complete new list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_horizon_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<ActivityInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItemInput>>,
}

impl SimulationPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.analysis_horizon_months.is_none()
            && self.activities.is_none()
            && self.line_items.is_none()
    }

    /// Merge over `base`, producing a new input. `base` is not mutated.
    pub fn apply(&self, base: &SimulationInput) -> SimulationInput {
        SimulationInput {
            name: self.name.clone().unwrap_or_else(|| base.name.clone()),
            analysis_horizon_months: self
                .analysis_horizon_months
                .unwrap_or(base.analysis_horizon_months),
            activities: self
                .activities
                .clone()
                .unwrap_or_else(|| base.activities.clone()),
            line_items: self
                .line_items
                .clone()
                .unwrap_or_else(|| base.line_items.clone()),
        }
    }
}

/// The aggregate indicator set for a simulation.
///
/// A pure function of (activities, line items, horizon): identical inputs
/// always produce identical indicators. `paybackMonths` and `roiPercent` are
/// zeroed — not infinite, not an error — whenever profit is non-positive or
/// there is no investment; callers that need to tell "no investment" apart
/// from "unprofitable" inspect `investmentTotal` and `monthlyProfit` directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub activity_count: usize,
    pub total_enrolled: u32,
    pub total_external: u32,
    pub total_participants: u32,
    /// Sum of per-activity monthly revenue.
    pub monthly_revenue: f64,
    /// Per-activity cost plus recurring line items.
    pub monthly_cost: f64,
    pub monthly_profit: f64,
    /// Percentage, 0.0 when there is no revenue.
    pub profit_margin: f64,
    pub investment_total: f64,
    pub recurring_total: f64,
    pub payback_months: f64,
    pub roi_percent: f64,
    pub horizon_months: u32,
    /// Per-category totals (investment and recurring alike), for display.
    pub by_category: BTreeMap<CostCategory, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_category_recurrence_table() {
        assert!(!CostCategory::InitialInvestment.is_recurring());
        assert!(CostCategory::MonthlyFixed.is_recurring());
        assert!(CostCategory::MonthlyVariable.is_recurring());
        assert!(!CostCategory::Marketing.is_recurring());
        assert!(!CostCategory::HumanResources.is_recurring());
    }

    #[test]
    fn segment_round_trips_kebab_case() {
        let json = serde_json::to_string(&Segment::LowerSecondary).unwrap();
        assert_eq!(json, "\"lower-secondary\"");
        let back: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Segment::LowerSecondary);
    }

    #[test]
    fn patch_apply_is_shallow_merge() {
        let base = SimulationInput {
            name: "Base".into(),
            analysis_horizon_months: 12,
            activities: vec![],
            line_items: vec![LineItemInput {
                category: CostCategory::Marketing,
                name: "Website".into(),
                amount: 800.0,
            }],
        };

        let patch = SimulationPatch {
            analysis_horizon_months: Some(36),
            ..Default::default()
        };
        let merged = patch.apply(&base);
        assert_eq!(merged.name, "Base");
        assert_eq!(merged.analysis_horizon_months, 36);
        assert_eq!(merged.line_items.len(), 1);

        // A present list replaces wholesale, it does not append.
        let patch = SimulationPatch {
            line_items: Some(vec![]),
            ..Default::default()
        };
        let merged = patch.apply(&base);
        assert!(merged.line_items.is_empty());
        assert_eq!(merged.analysis_horizon_months, 12);
    }

    #[test]
    fn empty_patch_is_identity() {
        let base = SimulationInput::default();
        let patch = SimulationPatch::default();
        assert!(patch.is_empty());
        let merged = patch.apply(&base);
        assert_eq!(merged.name, base.name);
        assert_eq!(merged.analysis_horizon_months, base.analysis_horizon_months);
    }

    #[test]
    fn simulation_input_defaults() {
        let input: SimulationInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.name, "Untitled plan");
        assert_eq!(input.analysis_horizon_months, 24);
        assert!(input.activities.is_empty());
        assert!(input.line_items.is_empty());
    }
}
