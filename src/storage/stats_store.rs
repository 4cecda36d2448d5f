//! Statistics queries.

use std::collections::HashMap;

use crate::records::{ExerciseRecord, ExerciseStats, ExerciseWithStats};
use crate::storage::database::{Database, DatabaseError};
use crate::storage::exercise_store::all_exercises;
use crate::storage::record_store::{query_records, SELECT_RECORD};

impl Database {
    /// Statistics over every record of `exercise_name`. An exercise with no
    /// records yields empty stats rather than an error.
    pub fn get_exercise_stats(&self, exercise_name: &str) -> Result<ExerciseStats, DatabaseError> {
        let records = self.get_records_by_exercise(exercise_name)?;
        Ok(ExerciseStats::from_records(&records))
    }

    /// Every exercise joined with its statistics, read in one transaction.
    pub fn get_exercises_with_stats(&self) -> Result<Vec<ExerciseWithStats>, DatabaseError> {
        let (exercises, records) = self.read(|tx| {
            let exercises = all_exercises(tx)?;
            let records = query_records(tx, &format!("{} ORDER BY id", SELECT_RECORD), &[])?;
            Ok((exercises, records))
        })?;

        let mut by_exercise: HashMap<String, Vec<ExerciseRecord>> = HashMap::new();
        for record in records {
            by_exercise
                .entry(record.exercise_name.clone())
                .or_default()
                .push(record);
        }

        Ok(exercises
            .into_iter()
            .map(|exercise| {
                let records = by_exercise.remove(&exercise.name).unwrap_or_default();
                ExerciseWithStats {
                    stats: ExerciseStats::from_records(&records),
                    exercise,
                }
            })
            .collect())
    }
}
