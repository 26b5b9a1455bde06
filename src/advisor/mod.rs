//! Advisory report generation.
//!
//! Two sources produce the same report shape: a remote OpenAI-compatible
//! chat endpoint ([`client`]) and a local rule engine ([`rules`]). The remote
//! path is best-effort only. Any failure there, or a missing API key, falls
//! back to the rules silently so a calculation never fails on advice.

pub mod client;
pub mod rules;

use serde::{Deserialize, Serialize};

use crate::config::AdvisoryConfig;
use crate::types::{ActivityResult, Indicators};

/// Benchmark figures the alerts and strengths are graded against.
pub mod benchmarks {
    /// Profit margin (%) considered healthy for an extracurricular portfolio.
    pub const IDEAL_PROFIT_MARGIN: f64 = 30.0;
    /// Margin (%) below which the plan is flagged as fragile.
    pub const LOW_MARGIN_THRESHOLD: f64 = 15.0;
    /// ROI (%) over the analysis horizon that marks a strong plan.
    pub const MIN_HEALTHY_ROI: f64 = 100.0;
    /// ROI (%) below which the return is flagged as weak.
    pub const LOW_ROI_THRESHOLD: f64 = 50.0;
    /// Payback (months) beyond which recovery is flagged as too slow.
    pub const MAX_PAYBACK_MONTHS: f64 = 36.0;
    /// Payback (months) at or under which recovery counts as a strength.
    pub const FAST_PAYBACK_MONTHS: f64 = 24.0;

    use crate::types::Segment;

    /// Recommended maximum student/teacher ratio per segment.
    pub fn student_teacher_ratio(segment: Segment) -> u32 {
        match segment {
            Segment::EarlyChildhood => 10,
            Segment::Primary => 15,
            Segment::LowerSecondary => 20,
            Segment::UpperSecondary => 25,
        }
    }

    /// Reference instructor hourly cost per segment.
    pub fn instructor_hourly_cost(segment: Segment) -> f64 {
        match segment {
            Segment::EarlyChildhood => 45.0,
            Segment::Primary => 50.0,
            Segment::LowerSecondary => 55.0,
            Segment::UpperSecondary => 65.0,
        }
    }

    /// Reference monthly revenue per student per segment.
    pub fn revenue_per_student(segment: Segment) -> f64 {
        match segment {
            Segment::EarlyChildhood => 150.0,
            Segment::Primary => 180.0,
            Segment::LowerSecondary => 200.0,
            Segment::UpperSecondary => 250.0,
        }
    }
}

/// Severity of an advisory alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    High,
    Medium,
    Low,
}

/// Where a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorySource {
    /// Produced by the remote model.
    Remote,
    /// Produced by the local rule engine.
    Rules,
}

/// A single flagged risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub suggested_action: String,
}

/// A single positive signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strength {
    pub message: String,
}

/// One phase of the rollout plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPhase {
    /// Human label, e.g. "Months 1-3".
    pub period: String,
    pub steps: Vec<String>,
}

/// The full advisory payload attached to a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryReport {
    /// Narrative analysis, markdown.
    pub analysis: String,
    pub alerts: Vec<Alert>,
    pub strengths: Vec<Strength>,
    pub recommendations: Vec<String>,
    pub action_plan: Vec<ActionPhase>,
    pub source: AdvisorySource,
}

/// Produce an advisory report for a computed simulation.
///
/// Never fails: remote errors are logged and the rule engine takes over.
pub fn generate(
    config: &AdvisoryConfig,
    indicators: &Indicators,
    activities: &[ActivityResult],
) -> AdvisoryReport {
    if config.enabled {
        if let Some(api_key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            match client::request_analysis(config, api_key, indicators, activities) {
                Ok(analysis) => {
                    // Alerts and structure always come from the rules; the
                    // remote model only supplies the narrative.
                    let mut report = rules::build_report(indicators, activities);
                    report.analysis = analysis;
                    report.source = AdvisorySource::Remote;
                    return report;
                }
                Err(e) => {
                    log::warn!("Remote advisory failed, using rule engine: {e}");
                }
            }
        }
    }
    rules::build_report(indicators, activities)
}
