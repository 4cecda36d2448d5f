//! Exercise operations, including the cascade into records.

use rusqlite::{params, Connection};

use crate::exercises::{Exercise, ExerciseSpec, ExerciseType};
use crate::storage::database::{query_failed, Database, DatabaseError, Table};

const SELECT_EXERCISE: &str = "SELECT name, type, default_count, instruction FROM exercises";

impl Database {
    // ========== Exercise CRUD Operations ==========

    /// Insert an exercise, replacing any existing one with the same name.
    pub fn add_exercise(&self, exercise: &Exercise) -> Result<(), DatabaseError> {
        self.check_exercise(exercise)?;

        self.write(|tx| {
            insert_exercise(tx, "INSERT OR REPLACE", exercise).map_err(query_failed)?;
            Ok(())
        })?;

        tracing::debug!("Saved exercise {}", exercise.name);
        Ok(())
    }

    /// Get an exercise by name.
    pub fn get_exercise(&self, name: &str) -> Result<Option<Exercise>, DatabaseError> {
        self.read(|tx| find_exercise(tx, name))
    }

    /// Get all exercises, ordered by name.
    pub fn get_all_exercises(&self) -> Result<Vec<Exercise>, DatabaseError> {
        self.read(|tx| all_exercises(tx))
    }

    /// Replace the exercise stored under `old_name` with `exercise`, which
    /// may carry a new name. Records logged under the old name follow the
    /// rename. Fails without changes if `old_name` does not exist or the
    /// new name belongs to a different exercise.
    pub fn update_exercise(&self, old_name: &str, exercise: &Exercise) -> Result<(), DatabaseError> {
        self.check_exercise(exercise)?;

        self.write(|tx| {
            if find_exercise(tx, old_name)?.is_none() {
                return Err(DatabaseError::NotFound(format!("Exercise {}", old_name)));
            }

            tx.execute("DELETE FROM exercises WHERE name = ?1", params![old_name])
                .map_err(query_failed)?;

            // Plain INSERT: a collision with another exercise aborts the whole rename
            insert_exercise(tx, "INSERT", exercise).map_err(|e| match query_failed(e) {
                DatabaseError::ConstraintViolation(_) => DatabaseError::ConstraintViolation(
                    format!("Exercise {} already exists", exercise.name),
                ),
                other => other,
            })?;

            if exercise.name != old_name {
                tx.execute(
                    "UPDATE records SET exercise_name = ?2 WHERE exercise_name = ?1",
                    params![old_name, exercise.name],
                )
                .map_err(query_failed)?;
            }

            Ok(())
        })?;

        tracing::debug!("Updated exercise {} -> {}", old_name, exercise.name);
        Ok(())
    }

    /// Delete an exercise and every record logged for it.
    ///
    /// Records are removed through the exercise-name index first, then the
    /// exercise itself, in one transaction: either both happen or neither.
    /// Returns the number of records removed.
    pub fn delete_exercise(&self, name: &str) -> Result<usize, DatabaseError> {
        let removed = self.write(|tx| {
            let removed = tx
                .execute("DELETE FROM records WHERE exercise_name = ?1", params![name])
                .map_err(query_failed)?;

            tx.execute("DELETE FROM exercises WHERE name = ?1", params![name])
                .map_err(query_failed)?;

            Ok(removed)
        })?;

        tracing::debug!("Deleted exercise {} and {} records", name, removed);
        Ok(removed)
    }

    /// Empty both the exercise and record collections.
    pub fn clear_all_exercises(&self) -> Result<(), DatabaseError> {
        self.write(|tx| {
            tx.execute("DELETE FROM records", []).map_err(query_failed)?;
            tx.execute("DELETE FROM exercises", []).map_err(query_failed)?;
            Ok(())
        })?;

        tracing::info!("Cleared all exercises and records");
        Ok(())
    }

    /// Count exercises in the database.
    pub fn count_exercises(&self) -> Result<usize, DatabaseError> {
        self.count_rows(Table::Exercises)
    }

    /// Delete records whose exercise no longer exists. Records can be
    /// orphaned because logging a record does not check the exercise.
    pub fn sweep_orphan_records(&self) -> Result<usize, DatabaseError> {
        let removed = self.write(|tx| {
            tx.execute(
                "DELETE FROM records
                 WHERE exercise_name NOT IN (SELECT name FROM exercises)",
                [],
            )
            .map_err(query_failed)
        })?;

        if removed > 0 {
            tracing::warn!("Removed {} orphaned records", removed);
        }
        Ok(removed)
    }

    fn check_exercise(&self, exercise: &Exercise) -> Result<(), DatabaseError> {
        exercise.validate()?;
        self.policy()
            .exercise_catalog
            .check(exercise.exercise_type())?;
        Ok(())
    }
}

/// Write one exercise row. `verb` is the INSERT flavour to use.
fn insert_exercise(
    conn: &Connection,
    verb: &str,
    exercise: &Exercise,
) -> Result<usize, rusqlite::Error> {
    conn.execute(
        &format!(
            "{} INTO exercises (name, type, default_count, instruction) VALUES (?1, ?2, ?3, ?4)",
            verb
        ),
        params![
            exercise.name,
            exercise.exercise_type().as_str(),
            exercise.spec.default_count(),
            exercise.instruction,
        ],
    )
}

pub(crate) fn all_exercises(conn: &Connection) -> Result<Vec<Exercise>, DatabaseError> {
    let mut stmt = conn
        .prepare(&format!("{} ORDER BY name", SELECT_EXERCISE))
        .map_err(query_failed)?;

    let rows = stmt.query_map([], ExerciseRow::from_row).map_err(query_failed)?;

    let mut exercises = Vec::new();
    for row in rows {
        let row = row.map_err(query_failed)?;
        exercises.push(row.into_exercise()?);
    }
    Ok(exercises)
}

pub(crate) fn find_exercise(conn: &Connection, name: &str) -> Result<Option<Exercise>, DatabaseError> {
    let result = conn.query_row(
        &format!("{} WHERE name = ?1", SELECT_EXERCISE),
        params![name],
        ExerciseRow::from_row,
    );

    match result {
        Ok(row) => Ok(Some(row.into_exercise()?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(query_failed(e)),
    }
}

/// Intermediate struct for reading exercise rows from database.
struct ExerciseRow {
    name: String,
    exercise_type: String,
    default_count: String,
    instruction: Option<String>,
}

impl ExerciseRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            exercise_type: row.get(1)?,
            default_count: row.get(2)?,
            instruction: row.get(3)?,
        })
    }

    fn into_exercise(self) -> Result<Exercise, DatabaseError> {
        let exercise_type = ExerciseType::parse(&self.exercise_type).map_err(|e| {
            DatabaseError::DeserializationError(format!("Exercise {}: {}", self.name, e))
        })?;

        let spec = ExerciseSpec::parse(exercise_type, &self.default_count).map_err(|e| {
            DatabaseError::DeserializationError(format!("Exercise {}: {}", self.name, e))
        })?;

        Ok(Exercise {
            name: self.name,
            spec,
            instruction: self.instruction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::ExerciseCatalog;
    use crate::records::NewRecord;
    use crate::storage::config::StorePolicy;
    use crate::validation::ValidationError;

    fn squats() -> Exercise {
        Exercise::new("Squats", ExerciseSpec::Strength { sets: 3, reps: 12 })
            .with_instruction("Keep your back straight")
    }

    #[test]
    fn test_exercise_insert_and_get() {
        let db = Database::open_in_memory().expect("Failed to create database");
        db.add_exercise(&squats()).expect("Failed to add exercise");

        let retrieved = db
            .get_exercise("Squats")
            .expect("Failed to get exercise")
            .expect("Exercise not found");
        assert_eq!(retrieved, squats());
    }

    #[test]
    fn test_exercise_get_missing() {
        let db = Database::open_in_memory().expect("Failed to create database");
        assert!(db.get_exercise("Nope").unwrap().is_none());
    }

    #[test]
    fn test_exercise_add_replaces_same_name() {
        let db = Database::open_in_memory().expect("Failed to create database");
        db.add_exercise(&squats()).unwrap();

        let changed = Exercise::new("Squats", ExerciseSpec::Strength { sets: 5, reps: 5 });
        db.add_exercise(&changed).unwrap();

        assert_eq!(db.count_exercises().unwrap(), 1);
        assert_eq!(db.get_exercise("Squats").unwrap().unwrap(), changed);
    }

    #[test]
    fn test_exercise_add_rejects_empty_name() {
        let db = Database::open_in_memory().expect("Failed to create database");
        let result = db.add_exercise(&Exercise::new("", ExerciseSpec::Core { seconds: 30 }));

        assert!(matches!(
            result,
            Err(DatabaseError::Validation(ValidationError::EmptyField(_)))
        ));
        assert_eq!(db.count_exercises().unwrap(), 0);
    }

    #[test]
    fn test_exercise_add_rejects_other_catalog() {
        let db = Database::open_in_memory().expect("Failed to create database");
        let result = db.add_exercise(&Exercise::new("Rows", ExerciseSpec::Weight { sets: 3, reps: 8 }));
        assert!(matches!(
            result,
            Err(DatabaseError::Validation(ValidationError::CatalogMismatch { .. }))
        ));

        let measured = Database::open_in_memory()
            .expect("Failed to create database")
            .with_policy(StorePolicy {
                exercise_catalog: ExerciseCatalog::Measured,
                ..Default::default()
            });
        assert!(measured
            .add_exercise(&Exercise::new("Rows", ExerciseSpec::Weight { sets: 3, reps: 8 }))
            .is_ok());
        assert!(measured.add_exercise(&squats()).is_err());
    }

    #[test]
    fn test_exercise_list_all() {
        let db = Database::open_in_memory().expect("Failed to create database");
        db.add_exercise(&squats()).unwrap();
        db.add_exercise(&Exercise::new("Plank", ExerciseSpec::Core { seconds: 60 }))
            .unwrap();

        let names: Vec<String> = db
            .get_all_exercises()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["Plank", "Squats"]);
    }

    #[test]
    fn test_exercise_update_in_place() {
        let db = Database::open_in_memory().expect("Failed to create database");
        db.add_exercise(&squats()).unwrap();

        let updated = Exercise::new("Squats", ExerciseSpec::Strength { sets: 4, reps: 8 });
        db.update_exercise("Squats", &updated).expect("Failed to update");

        assert_eq!(db.get_exercise("Squats").unwrap().unwrap(), updated);
    }

    #[test]
    fn test_exercise_rename_moves_records() {
        let db = Database::open_in_memory().expect("Failed to create database");
        db.add_exercise(&squats()).unwrap();
        db.add_record(NewRecord::new("Squats", 10)).unwrap();

        let renamed = Exercise::new("Back squats", ExerciseSpec::Strength { sets: 3, reps: 12 });
        db.update_exercise("Squats", &renamed).expect("Failed to rename");

        assert!(db.get_exercise("Squats").unwrap().is_none());
        assert!(db.get_exercise("Back squats").unwrap().is_some());
        assert_eq!(db.get_records_by_exercise("Back squats").unwrap().len(), 1);
        assert!(db.get_records_by_exercise("Squats").unwrap().is_empty());
    }

    #[test]
    fn test_exercise_rename_collision_is_atomic() {
        let db = Database::open_in_memory().expect("Failed to create database");
        db.add_exercise(&squats()).unwrap();
        let plank = Exercise::new("Plank", ExerciseSpec::Core { seconds: 60 });
        db.add_exercise(&plank).unwrap();

        let clash = Exercise::new("Plank", ExerciseSpec::Strength { sets: 1, reps: 1 });
        let result = db.update_exercise("Squats", &clash);

        assert!(matches!(result, Err(DatabaseError::ConstraintViolation(_))));
        assert_eq!(db.get_exercise("Squats").unwrap().unwrap(), squats());
        assert_eq!(db.get_exercise("Plank").unwrap().unwrap(), plank);
    }

    #[test]
    fn test_exercise_update_missing() {
        let db = Database::open_in_memory().expect("Failed to create database");
        let result = db.update_exercise("Ghost", &squats());

        assert!(matches!(result, Err(DatabaseError::NotFound(_))));
        assert_eq!(db.count_exercises().unwrap(), 0);
    }

    #[test]
    fn test_exercise_delete_cascades_records() {
        let db = Database::open_in_memory().expect("Failed to create database");
        db.add_exercise(&squats()).unwrap();
        db.add_exercise(&Exercise::new("Plank", ExerciseSpec::Core { seconds: 60 }))
            .unwrap();
        for count in [10, 12, 15] {
            db.add_record(NewRecord::new("Squats", count)).unwrap();
        }
        db.add_record(NewRecord::new("Plank", 60)).unwrap();

        let removed = db.delete_exercise("Squats").expect("Failed to delete");

        assert_eq!(removed, 3);
        assert!(db.get_exercise("Squats").unwrap().is_none());
        assert!(db.get_records_by_exercise("Squats").unwrap().is_empty());
        assert_eq!(db.count_records().unwrap(), 1);
    }

    #[test]
    fn test_clear_all_exercises_clears_records() {
        let db = Database::open_in_memory().expect("Failed to create database");
        db.add_exercise(&squats()).unwrap();
        db.add_record(NewRecord::new("Squats", 10)).unwrap();

        db.clear_all_exercises().unwrap();

        assert_eq!(db.count_exercises().unwrap(), 0);
        assert_eq!(db.count_records().unwrap(), 0);
    }

    #[test]
    fn test_sweep_orphan_records() {
        let db = Database::open_in_memory().expect("Failed to create database");
        db.add_exercise(&squats()).unwrap();
        db.add_record(NewRecord::new("Squats", 10)).unwrap();
        db.add_record(NewRecord::new("Deleted elsewhere", 5)).unwrap();

        assert_eq!(db.sweep_orphan_records().unwrap(), 1);
        assert_eq!(db.count_records().unwrap(), 1);
        assert_eq!(db.sweep_orphan_records().unwrap(), 0);
    }
}
