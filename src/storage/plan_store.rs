//! Plan operations.

use chrono::{DateTime, Local, Utc, Weekday};
use rusqlite::{params, Connection, ToSql};

use crate::plans::{NewPlan, Plan, PlanExercise, PlanPatch, Schedule};
use crate::storage::database::{query_failed, Database, DatabaseError, Table};

const SELECT_PLAN: &str =
    "SELECT id, name, exercises_json, schedule, created_at, updated_at FROM plans";

impl Database {
    // ========== Plan CRUD Operations ==========

    /// Validate and insert a new plan. Nothing is written if any constraint
    /// fails; a duplicate name surfaces as a constraint violation.
    pub fn add_plan(&self, plan: NewPlan) -> Result<Plan, DatabaseError> {
        let schedule = plan.validate(self.policy().require_plan_exercises)?;
        let exercises_json = serde_json::to_string(&plan.exercises)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let created_at = Utc::now();

        let id = self.write(|tx| {
            tx.execute(
                "INSERT INTO plans (name, exercises_json, schedule, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    plan.name,
                    exercises_json,
                    schedule.to_string(),
                    created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| duplicate_name(e, &plan.name))?;
            Ok(tx.last_insert_rowid())
        })?;

        tracing::debug!("Created plan {} ({})", id, plan.name);

        Ok(Plan {
            id,
            name: plan.name,
            exercises: plan.exercises,
            schedule,
            created_at,
            updated_at: None,
        })
    }

    /// Get all plans, ordered by id.
    pub fn get_all_plans(&self) -> Result<Vec<Plan>, DatabaseError> {
        self.read(|tx| query_plans(tx, &format!("{} ORDER BY id", SELECT_PLAN), &[]))
    }

    /// Get a plan by id.
    pub fn get_plan(&self, id: i64) -> Result<Option<Plan>, DatabaseError> {
        self.read(|tx| {
            let plans = query_plans(tx, &format!("{} WHERE id = ?1", SELECT_PLAN), &[&id])?;
            Ok(plans.into_iter().next())
        })
    }

    /// Get a plan by its unique name.
    pub fn get_plan_by_name(&self, name: &str) -> Result<Option<Plan>, DatabaseError> {
        self.read(|tx| {
            let plans = query_plans(tx, &format!("{} WHERE name = ?1", SELECT_PLAN), &[&name])?;
            Ok(plans.into_iter().next())
        })
    }

    /// Merge `patch` over an existing plan and stamp `updated_at`.
    pub fn update_plan(&self, id: i64, patch: PlanPatch) -> Result<Plan, DatabaseError> {
        let require_exercises = self.policy().require_plan_exercises;

        let plan = self.write(|tx| {
            let mut plan = query_plans(tx, &format!("{} WHERE id = ?1", SELECT_PLAN), &[&id])?
                .into_iter()
                .next()
                .ok_or_else(|| DatabaseError::NotFound(format!("Plan {}", id)))?;

            patch.apply_to(&mut plan, require_exercises)?;
            plan.updated_at = Some(Utc::now());

            let exercises_json = serde_json::to_string(&plan.exercises)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

            tx.execute(
                "UPDATE plans SET name = ?2, exercises_json = ?3, schedule = ?4, updated_at = ?5
                 WHERE id = ?1",
                params![
                    plan.id,
                    plan.name,
                    exercises_json,
                    plan.schedule.to_string(),
                    plan.updated_at.map(|t| t.to_rfc3339()),
                ],
            )
            .map_err(|e| duplicate_name(e, &plan.name))?;

            Ok(plan)
        })?;

        tracing::debug!("Updated plan {}", id);
        Ok(plan)
    }

    /// Delete a plan by id. Deleting an id that does not exist is a no-op.
    pub fn delete_plan(&self, id: i64) -> Result<(), DatabaseError> {
        self.write(|tx| {
            tx.execute("DELETE FROM plans WHERE id = ?1", params![id])
                .map_err(query_failed)?;
            Ok(())
        })
    }

    /// Plans scheduled for the current local weekday.
    pub fn get_today_plans(&self) -> Result<Vec<Plan>, DatabaseError> {
        use chrono::Datelike;
        self.get_plans_for_weekday(Local::now().weekday())
    }

    /// Plans whose schedule flag for `day` is set.
    pub fn get_plans_for_weekday(&self, day: Weekday) -> Result<Vec<Plan>, DatabaseError> {
        Ok(self
            .get_all_plans()?
            .into_iter()
            .filter(|plan| plan.schedule.is_active_on(day))
            .collect())
    }

    /// Count plans in the database.
    pub fn count_plans(&self) -> Result<usize, DatabaseError> {
        self.count_rows(Table::Plans)
    }

    /// Plan steps whose exercise no longer exists, as `(plan id, exercise
    /// name)` pairs. Deleting an exercise never edits plans, so callers use
    /// this to decide what to show or fix.
    pub fn find_dangling_plan_references(&self) -> Result<Vec<(i64, String)>, DatabaseError> {
        self.read(|tx| {
            let plans = query_plans(tx, &format!("{} ORDER BY id", SELECT_PLAN), &[])?;

            let mut stmt = tx
                .prepare("SELECT 1 FROM exercises WHERE name = ?1")
                .map_err(query_failed)?;

            let mut dangling = Vec::new();
            for plan in plans {
                for name in plan.exercise_names() {
                    let exists = stmt.exists(params![name]).map_err(query_failed)?;
                    if !exists {
                        dangling.push((plan.id, name.to_string()));
                    }
                }
            }
            Ok(dangling)
        })
    }
}

fn duplicate_name(e: rusqlite::Error, name: &str) -> DatabaseError {
    match query_failed(e) {
        DatabaseError::ConstraintViolation(_) => {
            DatabaseError::ConstraintViolation(format!("Plan {} already exists", name))
        }
        other => other,
    }
}

fn query_plans(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<Plan>, DatabaseError> {
    let mut stmt = conn.prepare(sql).map_err(query_failed)?;
    let rows = stmt.query_map(params, PlanRow::from_row).map_err(query_failed)?;

    let mut plans = Vec::new();
    for row in rows {
        let row = row.map_err(query_failed)?;
        plans.push(row.into_plan()?);
    }
    Ok(plans)
}

/// Intermediate struct for reading plan rows from database.
struct PlanRow {
    id: i64,
    name: String,
    exercises_json: String,
    schedule: String,
    created_at: String,
    updated_at: Option<String>,
}

impl PlanRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            exercises_json: row.get(2)?,
            schedule: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn into_plan(self) -> Result<Plan, DatabaseError> {
        let exercises: Vec<PlanExercise> =
            serde_json::from_str(&self.exercises_json).map_err(|e| {
                DatabaseError::DeserializationError(format!("Invalid plan exercises JSON: {}", e))
            })?;

        let schedule = Schedule::parse(&self.schedule)
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        let created_at = parse_timestamp(&self.created_at)?;
        let updated_at = self.updated_at.as_deref().map(parse_timestamp).transpose()?;

        Ok(Plan {
            id: self.id,
            name: self.name,
            exercises,
            schedule,
            created_at,
            updated_at,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid timestamp: {}", e)))
}
