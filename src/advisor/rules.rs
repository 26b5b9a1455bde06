//! Rule-based advisory fallback.
//!
//! Derives the structured report (alerts, strengths, recommendations, phased
//! plan) and a markdown narrative straight from the computed indicators, so a
//! useful report exists even when the remote model is unconfigured or down.

use std::fmt::Write as _;

use crate::types::{ActivityResult, Indicators};

use super::{benchmarks, ActionPhase, AdvisoryReport, Alert, AlertLevel, AdvisorySource, Strength};

/// Investment size above which the narrative calls out capital exposure.
const HIGH_INVESTMENT_THRESHOLD: f64 = 100_000.0;

/// Build the full rule-derived report.
pub fn build_report(indicators: &Indicators, activities: &[ActivityResult]) -> AdvisoryReport {
    let alerts = derive_alerts(indicators);
    let strengths = derive_strengths(indicators, activities);
    let recommendations = derive_recommendations(indicators, activities);
    let action_plan = action_plan();
    let analysis = render_narrative(indicators, activities, &strengths, &alerts, &recommendations);

    AdvisoryReport {
        analysis,
        alerts,
        strengths,
        recommendations,
        action_plan,
        source: AdvisorySource::Rules,
    }
}

/// Risk alerts graded against the benchmark table.
pub fn derive_alerts(indicators: &Indicators) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if indicators.profit_margin < benchmarks::LOW_MARGIN_THRESHOLD {
        alerts.push(Alert {
            level: AlertLevel::High,
            message: format!(
                "Profit margin is very low ({:.1}%)",
                indicators.profit_margin
            ),
            suggested_action: "Raise revenue or cut costs".into(),
        });
    }

    if indicators.payback_months > benchmarks::MAX_PAYBACK_MONTHS {
        alerts.push(Alert {
            level: AlertLevel::High,
            message: format!(
                "Payback period is too long ({:.1} months)",
                indicators.payback_months
            ),
            suggested_action: "Reduce the initial investment or increase monthly profit".into(),
        });
    }

    if indicators.roi_percent < benchmarks::LOW_ROI_THRESHOLD {
        alerts.push(Alert {
            level: AlertLevel::Medium,
            message: format!(
                "ROI is below the acceptable range ({:.1}%)",
                indicators.roi_percent
            ),
            suggested_action: "Improve the cost/benefit ratio of the portfolio".into(),
        });
    }

    alerts
}

fn derive_strengths(indicators: &Indicators, activities: &[ActivityResult]) -> Vec<Strength> {
    let mut strengths = Vec::new();

    if indicators.profit_margin >= 25.0 {
        strengths.push(Strength {
            message: format!(
                "Healthy profit margin ({:.1}%)",
                indicators.profit_margin
            ),
        });
    }
    if indicators.roi_percent >= benchmarks::MIN_HEALTHY_ROI {
        strengths.push(Strength {
            message: format!(
                "Excellent ROI ({:.1}% over {} months)",
                indicators.roi_percent, indicators.horizon_months
            ),
        });
    }
    if indicators.payback_months > 0.0
        && indicators.payback_months <= benchmarks::FAST_PAYBACK_MONTHS
    {
        strengths.push(Strength {
            message: format!("Fast payback ({:.1} months)", indicators.payback_months),
        });
    }
    if activities.len() >= 4 {
        strengths.push(Strength {
            message: format!("Well-diversified portfolio ({} activities)", activities.len()),
        });
    }

    strengths
}

fn derive_recommendations(
    indicators: &Indicators,
    activities: &[ActivityResult],
) -> Vec<String> {
    let mut recs = vec![
        "Optimize the cost structure: review variable costs and negotiate with suppliers".into(),
        "Increase perceived value: differentiate activities to justify higher rates".into(),
        "Diversify revenue sources: consider discounted term or annual packages".into(),
    ];

    if indicators.investment_total > HIGH_INVESTMENT_THRESHOLD {
        recs.push("Contain the initial investment: prioritize essential equipment first".into());
    }

    // Per-activity checks against the segment reference figures.
    for result in activities {
        let activity = &result.activity;
        let cost_ref = benchmarks::instructor_hourly_cost(activity.segment);
        if activity.instructor_hourly_cost > cost_ref {
            recs.push(format!(
                "Instructor cost for \"{}\" ({:.2}/h) exceeds the {} reference of {:.2}/h",
                activity.name,
                activity.instructor_hourly_cost,
                activity.segment.label(),
                cost_ref,
            ));
        }
        let revenue_ref = benchmarks::revenue_per_student(activity.segment);
        if activity.rate_per_enrolled > 0.0 && activity.rate_per_enrolled < revenue_ref {
            recs.push(format!(
                "Enrolled rate for \"{}\" ({:.2}) is below the {} market reference of {:.2}",
                activity.name,
                activity.rate_per_enrolled,
                activity.segment.label(),
                revenue_ref,
            ));
        }
    }

    recs
}

fn action_plan() -> Vec<ActionPhase> {
    vec![
        ActionPhase {
            period: "Months 1-3".into(),
            steps: vec![
                "Launch the 2-3 strongest activities".into(),
                "Run an opening campaign with promotional pricing".into(),
                "Hire the minimum viable team".into(),
            ],
        },
        ActionPhase {
            period: "Months 4-6".into(),
            steps: vec![
                "Review per-activity performance".into(),
                "Adjust pricing to match market acceptance".into(),
                "Expand into additional activities".into(),
            ],
        },
        ActionPhase {
            period: "Months 7-12".into(),
            steps: vec![
                "Pursue operational efficiencies".into(),
                "Introduce loyalty packages".into(),
                "Expand into new school segments".into(),
            ],
        },
    ]
}

fn render_narrative(
    indicators: &Indicators,
    activities: &[ActivityResult],
    strengths: &[Strength],
    alerts: &[Alert],
    recommendations: &[String],
) -> String {
    let mut out = String::from("# Business Plan Analysis\n\n");

    let _ = writeln!(
        out,
        "{} activities, {} participants, monthly profit {:.2} at a {:.1}% margin.",
        activities.len(),
        indicators.total_participants,
        indicators.monthly_profit,
        indicators.profit_margin,
    );

    out.push_str("\n## Strengths\n\n");
    if strengths.is_empty() {
        out.push_str("- No standout strengths at the current figures\n");
    }
    for s in strengths {
        let _ = writeln!(out, "- {}", s.message);
    }

    out.push_str("\n## Attention Points\n\n");
    if alerts.is_empty() && indicators.investment_total <= HIGH_INVESTMENT_THRESHOLD {
        out.push_str("- No benchmark thresholds were breached\n");
    }
    for a in alerts {
        let _ = writeln!(out, "- {}. {}", a.message, a.suggested_action);
    }
    if indicators.investment_total > HIGH_INVESTMENT_THRESHOLD {
        let _ = writeln!(
            out,
            "- High initial investment ({:.0})",
            indicators.investment_total
        );
    }

    out.push_str("\n## Recommendations\n\n");
    for (i, rec) in recommendations.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, rec);
    }

    out.push_str("\n## Action Plan\n\n");
    for phase in action_plan() {
        let _ = writeln!(out, "**{}:**", phase.period);
        for step in &phase.steps {
            let _ = writeln!(out, "- {}", step);
        }
        out.push('\n');
    }

    out
}
