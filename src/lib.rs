//! eduplan — financial simulator for school extracurricular programs.
//!
//! Computes activity-level costs and revenue, portfolio indicators (payback,
//! ROI, margin), stores simulation snapshots in SQLite, and attaches an
//! advisory report from a remote model or a local rule engine.

pub mod advisor;
pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
mod migrations;
pub mod normalize;
pub mod services;
pub mod state;
pub mod types;
