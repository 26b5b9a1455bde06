//! Command-line entry point for the eduplan simulator.
//!
//! Usage:
//!   eduplan calculate <input.json>
//!   eduplan recalculate <id> <patch.json>
//!   eduplan update <id> <input.json>
//!   eduplan show <id>
//!   eduplan list [n]
//!   eduplan delete <id>
//!   eduplan stats

use std::fs;
use std::process::ExitCode;

use eduplan::api;
use eduplan::state::AppState;
use eduplan::types::{SimulationInput, SimulationPatch};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let state = AppState::new();
    match run(&state, command, &args[1..]) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

const USAGE: &str = "Usage:
  eduplan calculate <input.json>
  eduplan recalculate <id> <patch.json>
  eduplan update <id> <input.json>
  eduplan show <id>
  eduplan list [n]
  eduplan delete <id>
  eduplan stats";

fn run(state: &AppState, command: &str, rest: &[String]) -> Result<String, String> {
    match command {
        "calculate" => {
            let input: SimulationInput = read_json(arg(rest, 0, "input file")?)?;
            pretty(&api::calculate(state, input))
        }
        "recalculate" => {
            let id = parse_id(arg(rest, 0, "simulation id")?)?;
            let patch: SimulationPatch = read_json(arg(rest, 1, "patch file")?)?;
            let result = api::recalculate(state, id, patch).map_err(|e| e.message)?;
            pretty(&result)
        }
        "update" => {
            let id = parse_id(arg(rest, 0, "simulation id")?)?;
            let input: SimulationInput = read_json(arg(rest, 1, "input file")?)?;
            let result = api::update(state, id, input).map_err(|e| e.message)?;
            pretty(&result)
        }
        "show" => {
            let id = parse_id(arg(rest, 0, "simulation id")?)?;
            let record = api::get(state, id).map_err(|e| e.message)?;
            pretty(&record)
        }
        "list" => {
            let limit = match rest.first() {
                Some(raw) => raw
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid list limit: {raw}"))?,
                None => 20,
            };
            let summaries = api::list(state, limit).map_err(|e| e.message)?;
            pretty(&summaries)
        }
        "delete" => {
            let id = parse_id(arg(rest, 0, "simulation id")?)?;
            api::delete(state, id).map_err(|e| e.message)?;
            Ok(format!("Deleted simulation {id}"))
        }
        "stats" => {
            let stats = api::stats(state).map_err(|e| e.message)?;
            pretty(&stats)
        }
        other => Err(format!("Unknown command '{other}'\n{USAGE}")),
    }
}

fn arg<'a>(rest: &'a [String], index: usize, what: &str) -> Result<&'a str, String> {
    rest.get(index)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing {what}\n{USAGE}"))
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("Invalid simulation id: {raw}"))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("Cannot read {path}: {e}"))?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON in {path}: {e}"))
}

fn pretty<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Serialization failed: {e}"))
}
