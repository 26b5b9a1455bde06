//! Simulation CRUD.
//!
//! Create and update always write the full snapshot (summary columns, payload
//! blob, child activity rows) inside one transaction. Delete cascades to the
//! owned activities through the FK.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::advisor::AdvisoryReport;
use crate::types::{ActivityInput, ActivityResult, Indicators, SimulationInput};

use super::{
    DashboardStats, DbError, PlanDb, SimulationRecord, SimulationSummary, SnapshotPayload,
};

impl PlanDb {
    /// Persist a freshly computed simulation. Returns the new row id.
    pub fn create_simulation(
        &self,
        input: &SimulationInput,
        indicators: &Indicators,
        activities: &[ActivityResult],
        advisory: Option<&AdvisoryReport>,
    ) -> Result<i64, DbError> {
        let now = Utc::now().to_rfc3339();
        let payload = encode_payload(input, indicators, activities)?;
        let advisory_json = advisory.map(serde_json::to_string).transpose()?;

        self.with_transaction(|db| {
            db.conn_ref().execute(
                "INSERT INTO simulations (
                    name, created_at, updated_at,
                    total_enrolled, total_participants,
                    investment_total, monthly_cost, monthly_revenue,
                    monthly_profit, payback_months, roi_percent, profit_margin,
                    payload, advisory
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    input.name,
                    now,
                    now,
                    indicators.total_enrolled,
                    indicators.total_participants,
                    indicators.investment_total,
                    indicators.monthly_cost,
                    indicators.monthly_revenue,
                    indicators.monthly_profit,
                    indicators.payback_months,
                    indicators.roi_percent,
                    indicators.profit_margin,
                    payload,
                    advisory_json,
                ],
            )?;
            let id = db.conn_ref().last_insert_rowid();
            db.insert_activities(id, &input.activities)?;
            Ok(id)
        })
    }

    /// Replace a stored snapshot wholesale. Returns false when `id` does not
    /// exist (nothing is written in that case).
    pub fn update_simulation(
        &self,
        id: i64,
        input: &SimulationInput,
        indicators: &Indicators,
        activities: &[ActivityResult],
        advisory: Option<&AdvisoryReport>,
    ) -> Result<bool, DbError> {
        let now = Utc::now().to_rfc3339();
        let payload = encode_payload(input, indicators, activities)?;
        let advisory_json = advisory.map(serde_json::to_string).transpose()?;

        self.with_transaction(|db| {
            let updated = db.conn_ref().execute(
                "UPDATE simulations SET
                    name = ?1,
                    updated_at = ?2,
                    total_enrolled = ?3,
                    total_participants = ?4,
                    investment_total = ?5,
                    monthly_cost = ?6,
                    monthly_revenue = ?7,
                    monthly_profit = ?8,
                    payback_months = ?9,
                    roi_percent = ?10,
                    profit_margin = ?11,
                    payload = ?12,
                    advisory = ?13
                 WHERE id = ?14",
                params![
                    input.name,
                    now,
                    indicators.total_enrolled,
                    indicators.total_participants,
                    indicators.investment_total,
                    indicators.monthly_cost,
                    indicators.monthly_revenue,
                    indicators.monthly_profit,
                    indicators.payback_months,
                    indicators.roi_percent,
                    indicators.profit_margin,
                    payload,
                    advisory_json,
                    id,
                ],
            )?;
            if updated == 0 {
                return Ok(false);
            }

            // Full replace: drop the old child rows, write the new list.
            db.conn_ref().execute(
                "DELETE FROM simulation_activities WHERE simulation_id = ?1",
                params![id],
            )?;
            db.insert_activities(id, &input.activities)?;
            Ok(true)
        })
    }

    /// Remove a simulation and (via FK cascade) its activities.
    /// Returns false when `id` does not exist.
    pub fn delete_simulation(&self, id: i64) -> Result<bool, DbError> {
        let deleted = self
            .conn_ref()
            .execute("DELETE FROM simulations WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Load a stored snapshot, fully hydrated from the payload blob.
    pub fn get_simulation(&self, id: i64) -> Result<Option<SimulationRecord>, DbError> {
        let row = self
            .conn_ref()
            .query_row(
                "SELECT id, name, created_at, updated_at, payload, advisory
                 FROM simulations WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, name, created_at, updated_at, payload, advisory)) = row else {
            return Ok(None);
        };

        let snapshot: SnapshotPayload = serde_json::from_str(&payload)?;

        // A malformed advisory blob is not worth failing the read over.
        let advisory = advisory.and_then(|json| match serde_json::from_str(&json) {
            Ok(report) => Some(report),
            Err(e) => {
                log::warn!("Dropping unreadable advisory blob for simulation {id}: {e}");
                None
            }
        });

        Ok(Some(SimulationRecord {
            id,
            name,
            created_at,
            updated_at,
            input: snapshot.input,
            indicators: snapshot.indicators,
            activities: snapshot.activities,
            advisory,
        }))
    }

    /// List stored simulations, most recently updated first.
    pub fn list_simulations(&self, limit: u32) -> Result<Vec<SimulationSummary>, DbError> {
        let mut stmt = self.conn_ref().prepare(
            "SELECT id, name, created_at, updated_at, total_participants,
                    investment_total, monthly_revenue, monthly_profit,
                    profit_margin, roi_percent, payback_months
             FROM simulations
             ORDER BY updated_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(SimulationSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
                updated_at: row.get(3)?,
                total_participants: row.get(4)?,
                investment_total: row.get(5)?,
                monthly_revenue: row.get(6)?,
                monthly_profit: row.get(7)?,
                profit_margin: row.get(8)?,
                roi_percent: row.get(9)?,
                payback_months: row.get(10)?,
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }

    /// Aggregate dashboard figures across all stored simulations.
    pub fn dashboard_stats(&self) -> Result<DashboardStats, DbError> {
        let stats = self.conn_ref().query_row(
            "SELECT COUNT(*),
                    COALESCE(AVG(roi_percent), 0),
                    COALESCE(AVG(payback_months), 0)
             FROM simulations",
            [],
            |row| {
                Ok(DashboardStats {
                    simulation_count: row.get(0)?,
                    avg_roi_percent: row.get(1)?,
                    avg_payback_months: row.get(2)?,
                })
            },
        )?;
        Ok(stats)
    }

    fn insert_activities(
        &self,
        simulation_id: i64,
        activities: &[ActivityInput],
    ) -> Result<(), DbError> {
        let mut stmt = self.conn_ref().prepare(
            "INSERT INTO simulation_activities (
                simulation_id, segment, name,
                instructor_hourly_cost, weekly_hours, weeks_per_month,
                monthly_material_cost, enrolled_participants,
                external_participants, rate_per_enrolled, rate_per_external
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        for activity in activities {
            stmt.execute(params![
                simulation_id,
                activity.segment.as_str(),
                activity.name,
                activity.instructor_hourly_cost,
                activity.weekly_hours,
                activity.weeks_per_month,
                activity.monthly_material_cost,
                activity.enrolled_participants,
                activity.external_participants,
                activity.rate_per_enrolled,
                activity.rate_per_external,
            ])?;
        }
        Ok(())
    }
}

fn encode_payload(
    input: &SimulationInput,
    indicators: &Indicators,
    activities: &[ActivityResult],
) -> Result<String, DbError> {
    let payload = SnapshotPayload {
        input: input.clone(),
        indicators: indicators.clone(),
        activities: activities.to_vec(),
    };
    Ok(serde_json::to_string(&payload)?)
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_db;
    use super::*;
    use crate::engine::compute_indicators;
    use crate::types::{CostCategory, LineItemInput, Segment};

    fn sample_input(name: &str) -> SimulationInput {
        SimulationInput {
            name: name.into(),
            analysis_horizon_months: 24,
            activities: vec![ActivityInput {
                segment: Segment::Primary,
                name: "Chess club".into(),
                instructor_hourly_cost: 50.0,
                weekly_hours: 4.0,
                weeks_per_month: 4.0,
                monthly_material_cost: 100.0,
                enrolled_participants: 10,
                external_participants: 5,
                rate_per_enrolled: 150.0,
                rate_per_external: 200.0,
            }],
            line_items: vec![LineItemInput {
                category: CostCategory::InitialInvestment,
                name: "Renovation".into(),
                amount: 20_000.0,
            }],
        }
    }

    fn store(db: &PlanDb, input: &SimulationInput) -> i64 {
        let (indicators, activities) = compute_indicators(
            &input.activities,
            &input.line_items,
            input.analysis_horizon_months,
        );
        db.create_simulation(input, &indicators, &activities, None)
            .expect("create")
    }

    #[test]
    fn round_trip_preserves_indicators() {
        let db = test_db();
        let input = sample_input("Round trip");
        let id = store(&db, &input);

        let record = db.get_simulation(id).expect("get").expect("exists");
        let (expected, _) = compute_indicators(
            &input.activities,
            &input.line_items,
            input.analysis_horizon_months,
        );
        assert_eq!(record.indicators, expected);
        assert_eq!(record.name, "Round trip");
        assert_eq!(record.input.activities.len(), 1);
    }

    #[test]
    fn get_missing_returns_none() {
        let db = test_db();
        assert!(db.get_simulation(999).expect("get").is_none());
    }

    #[test]
    fn update_replaces_snapshot_and_activities() {
        let db = test_db();
        let id = store(&db, &sample_input("Before"));

        let mut updated_input = sample_input("After");
        updated_input.activities.clear();
        let (indicators, activities) = compute_indicators(
            &updated_input.activities,
            &updated_input.line_items,
            updated_input.analysis_horizon_months,
        );
        let found = db
            .update_simulation(id, &updated_input, &indicators, &activities, None)
            .expect("update");
        assert!(found);

        let record = db.get_simulation(id).expect("get").expect("exists");
        assert_eq!(record.name, "After");
        assert!(record.input.activities.is_empty());
        assert_eq!(record.indicators.monthly_revenue, 0.0);

        let child_rows: i64 = db
            .conn_ref()
            .query_row(
                "SELECT COUNT(*) FROM simulation_activities WHERE simulation_id = ?1",
                params![id],
                |r| r.get(0),
            )
            .expect("count");
        assert_eq!(child_rows, 0, "old activity rows must be replaced");
    }

    #[test]
    fn update_missing_returns_false() {
        let db = test_db();
        let input = sample_input("Ghost");
        let (indicators, activities) = compute_indicators(
            &input.activities,
            &input.line_items,
            input.analysis_horizon_months,
        );
        let found = db
            .update_simulation(42, &input, &indicators, &activities, None)
            .expect("update");
        assert!(!found);
    }

    #[test]
    fn delete_cascades_to_activities() {
        let db = test_db();
        let id = store(&db, &sample_input("Doomed"));

        assert!(db.delete_simulation(id).expect("delete"));
        assert!(db.get_simulation(id).expect("get").is_none());

        let child_rows: i64 = db
            .conn_ref()
            .query_row(
                "SELECT COUNT(*) FROM simulation_activities WHERE simulation_id = ?1",
                params![id],
                |r| r.get(0),
            )
            .expect("count");
        assert_eq!(child_rows, 0, "cascade must remove owned activities");

        assert!(!db.delete_simulation(id).expect("second delete"));
    }

    #[test]
    fn list_orders_most_recent_first() {
        let db = test_db();
        let first = store(&db, &sample_input("First"));
        let second = store(&db, &sample_input("Second"));
        let third = store(&db, &sample_input("Third"));

        let all = db.list_simulations(10).expect("list");
        assert_eq!(all.len(), 3);
        // Same-timestamp rows fall back to id ordering, newest first.
        assert_eq!(all[0].id, third);
        assert_eq!(all[2].id, first);

        let limited = db.list_simulations(2).expect("list");
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, third);
        assert_eq!(limited[1].id, second);
    }

    #[test]
    fn dashboard_stats_average_stored_rows() {
        let db = test_db();
        let empty = db.dashboard_stats().expect("stats");
        assert_eq!(empty.simulation_count, 0);
        assert_eq!(empty.avg_roi_percent, 0.0);

        store(&db, &sample_input("A"));
        store(&db, &sample_input("B"));

        let stats = db.dashboard_stats().expect("stats");
        assert_eq!(stats.simulation_count, 2);
        // Both rows share the same figures, so the average equals them.
        assert_eq!(stats.avg_roi_percent, 192.0);
        assert_eq!(stats.avg_payback_months, 12.5);
    }
}
