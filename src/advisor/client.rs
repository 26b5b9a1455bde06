//! Chat-completions client for remote advisory analysis.
//!
//! Talks to any OpenAI-compatible endpoint with Bearer auth. Returns the
//! narrative markdown only; the structured report layers are rule-derived
//! regardless of source.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::AdvisoryConfig;
use crate::types::{ActivityResult, Indicators};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SYSTEM_PROMPT: &str =
    "You are a consultant specializing in financial planning for educational institutions.";
/// Cap on activities listed in the prompt; larger portfolios are truncated.
const MAX_PROMPT_ACTIVITIES: usize = 10;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("Advisory request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Advisory endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Advisory response had no completion choices")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Request a narrative analysis of the computed simulation.
pub fn request_analysis(
    config: &AdvisoryConfig,
    api_key: &str,
    indicators: &Indicators,
    activities: &[ActivityResult],
) -> Result<String, AdvisoryError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
    let body = serde_json::json!({
        "model": config.model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": build_prompt(indicators, activities) },
        ],
        "temperature": 0.7,
        "max_tokens": 1500,
    });

    let resp = client
        .post(&url)
        .bearer_auth(api_key)
        .json(&body)
        .send()?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(AdvisoryError::Status { status, body });
    }

    let parsed: ChatResponse = resp.json()?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(AdvisoryError::EmptyResponse)?;
    Ok(content)
}

fn build_prompt(indicators: &Indicators, activities: &[ActivityResult]) -> String {
    let mut activity_lines = String::new();
    for (i, result) in activities.iter().take(MAX_PROMPT_ACTIVITIES).enumerate() {
        let a = &result.activity;
        let _ = writeln!(
            activity_lines,
            "{}. {} ({}): {} enrolled + {} external, revenue {:.0}/month, cost {:.0}/month",
            i + 1,
            a.name,
            a.segment.label(),
            a.enrolled_participants,
            a.external_participants,
            result.monthly_revenue,
            result.monthly_cost,
        );
    }

    format!(
        "Analyze this business plan for a school / educational center:\n\n\
         SUMMARY:\n\
         - Total activities: {activity_count}\n\
         - Initial investment: {investment:.0}\n\
         - Monthly revenue: {revenue:.0}\n\
         - Total monthly cost: {cost:.0}\n\
         - Monthly profit: {profit:.0}\n\
         - Profit margin: {margin:.1}%\n\
         - ROI ({horizon} months): {roi:.1}%\n\
         - Payback: {payback:.1} months\n\n\
         ACTIVITIES:\n\
         {activities}\n\
         Please provide an analysis with:\n\
         1. STRENGTHS (up to 3 items)\n\
         2. ATTENTION POINTS / RISKS (up to 3 items)\n\
         3. SPECIFIC RECOMMENDATIONS (3-5 practical recommendations)\n\
         4. ACTION PLAN (concrete implementation steps)\n\
         5. BENCHMARK COMPARISON (current figures vs market)\n\n\
         Be specific and practical, and focus on actionable steps.\n\
         Use markdown for formatting.",
        activity_count = indicators.activity_count,
        investment = indicators.investment_total,
        revenue = indicators.monthly_revenue,
        cost = indicators.monthly_cost,
        profit = indicators.monthly_profit,
        margin = indicators.profit_margin,
        horizon = indicators.horizon_months,
        roi = indicators.roi_percent,
        payback = indicators.payback_months,
        activities = activity_lines,
    )
}
