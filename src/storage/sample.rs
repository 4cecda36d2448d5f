//! Sample data for a fresh database.
//!
//! Goes through the public add operations only.

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::exercises::{Exercise, ExerciseCatalog, ExerciseSpec};
use crate::plans::{NewPlan, PlanExercise};
use crate::records::{NewRecord, Rpe, WeightUnit};
use crate::storage::database::{Database, DatabaseError};

/// What [`seed_sample_data`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub exercises: usize,
    pub records: usize,
    pub plans: usize,
}

fn sample_exercises(catalog: ExerciseCatalog) -> Vec<Exercise> {
    match catalog {
        ExerciseCatalog::Classic => vec![
            Exercise::new("Squats", ExerciseSpec::Strength { sets: 3, reps: 12 })
                .with_instruction("Feet shoulder-width apart, keep your chest up"),
            Exercise::new("Push-ups", ExerciseSpec::Strength { sets: 3, reps: 10 }),
            Exercise::new("Running", ExerciseSpec::Cardio { seconds: 1800 }),
            Exercise::new("Plank", ExerciseSpec::Core { seconds: 60 })
                .with_instruction("Straight line from head to heels"),
        ],
        ExerciseCatalog::Measured => vec![
            Exercise::new("Squats", ExerciseSpec::Weight { sets: 3, reps: 12 })
                .with_instruction("Feet shoulder-width apart, keep your chest up"),
            Exercise::new("Push-ups", ExerciseSpec::Count { reps: 20 }),
            Exercise::new("Running", ExerciseSpec::Timed { seconds: 1800 }),
            Exercise::new("Plank", ExerciseSpec::Timed { seconds: 60 })
                .with_instruction("Straight line from head to heels"),
        ],
    }
}

/// Add a small set of exercises, two weeks of records ending on `today`,
/// and two plans. Does nothing unless all three collections are empty.
pub fn seed_sample_data(db: &Database, today: NaiveDate) -> Result<SeedSummary, DatabaseError> {
    let mut summary = SeedSummary::default();

    if db.count_exercises()? + db.count_records()? + db.count_plans()? > 0 {
        tracing::info!("Store is not empty, skipping sample data");
        return Ok(summary);
    }
    let evening = NaiveTime::from_hms_opt(18, 30, 0).unwrap_or_default();

    for exercise in sample_exercises(db.policy().exercise_catalog) {
        db.add_exercise(&exercise)?;
        summary.exercises += 1;
    }

    // Every other day, oldest first, ending today
    for step in 0..7u32 {
        let days_ago = 12 - 2 * step as i64;
        let date = today - Duration::days(days_ago);
        let progress = step;
        // Alternates 7 / 7.5 / 8
        let rpe = Rpe::new(7.0 + (days_ago % 3) as f64 * 0.5)?;

        db.add_record(
            NewRecord::new("Squats", 10 + progress)
                .on(date)
                .at(evening)
                .with_rpe(rpe)
                .with_weight(60.0 + progress as f64 * 2.5, WeightUnit::Kg),
        )?;
        db.add_record(NewRecord::new("Plank", 45 + progress * 5).on(date).at(evening))?;
        summary.records += 2;
    }

    db.add_plan(
        NewPlan::new("Leg day", "1001000")
            .with_exercise(PlanExercise::new("Squats"))
            .with_exercise(PlanExercise::with_count("Plank", 90)),
    )?;
    db.add_plan(
        NewPlan::new("Cardio", "0100110")
            .with_exercise(PlanExercise::new("Running"))
            .with_exercise(PlanExercise::new("Push-ups")),
    )?;
    summary.plans += 2;

    tracing::info!(
        "Seeded {} exercises, {} records, {} plans",
        summary.exercises,
        summary.records,
        summary.plans
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::config::StorePolicy;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_seed_counts_match_store() {
        let db = Database::open_in_memory().expect("Failed to create database");
        let summary = seed_sample_data(&db, today()).expect("Failed to seed");

        assert_eq!(db.count_exercises().unwrap(), summary.exercises);
        assert_eq!(db.count_records().unwrap(), summary.records);
        assert_eq!(db.count_plans().unwrap(), summary.plans);
        assert!(db.find_dangling_plan_references().unwrap().is_empty());
    }

    #[test]
    fn test_seed_shows_progress() {
        let db = Database::open_in_memory().expect("Failed to create database");
        seed_sample_data(&db, today()).expect("Failed to seed");

        let stats = db.get_exercise_stats("Squats").unwrap();
        assert_eq!(stats.total_workouts, 7);
        assert!(stats.improvement > 0.0);
        assert_eq!(stats.last_workout.unwrap().date, today());
    }

    #[test]
    fn test_seed_skips_non_empty_store() {
        let db = Database::open_in_memory().expect("Failed to create database");
        db.add_plan(NewPlan::new("Leg day", "0000001").with_exercise(PlanExercise::new("Lunges")))
            .unwrap();

        let summary = seed_sample_data(&db, today()).expect("Seeding should not fail");

        assert_eq!(summary, SeedSummary::default());
        assert_eq!(db.count_exercises().unwrap(), 0);
        assert_eq!(db.count_records().unwrap(), 0);
        assert_eq!(db.count_plans().unwrap(), 1);
    }

    #[test]
    fn test_seed_respects_catalog() {
        let db = Database::open_in_memory()
            .expect("Failed to create database")
            .with_policy(StorePolicy {
                exercise_catalog: ExerciseCatalog::Measured,
                ..Default::default()
            });

        seed_sample_data(&db, today()).expect("Failed to seed measured catalog");
        let plank = db.get_exercise("Plank").unwrap().unwrap();
        assert_eq!(plank.spec, ExerciseSpec::Timed { seconds: 60 });
    }
}
