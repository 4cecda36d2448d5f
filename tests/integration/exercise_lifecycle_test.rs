//! Integration tests for exercises, records and statistics.
//!
//! Exercises the public store API end to end: define an exercise, log
//! records against it, read stats back and remove it again.

use chrono::{NaiveDate, NaiveTime};
use workout_tracker::{
    Database, DatabaseError, Exercise, ExerciseSpec, NewRecord, Rpe, WeightUnit,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn morning() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 30, 0).unwrap()
}

#[test]
fn test_exercise_roundtrip_is_deep_equal() {
    let db = Database::open_in_memory().unwrap();
    let squats = Exercise::new("Squats", ExerciseSpec::Strength { sets: 3, reps: 12 })
        .with_instruction("Keep your heels down");

    db.add_exercise(&squats).unwrap();

    assert_eq!(db.get_exercise("Squats").unwrap(), Some(squats.clone()));
    assert_eq!(db.get_all_exercises().unwrap(), vec![squats]);
}

#[test]
fn test_full_exercise_lifecycle() {
    let db = Database::open_in_memory().unwrap();
    db.add_exercise(&Exercise::new("Squats", ExerciseSpec::Strength { sets: 3, reps: 10 }))
        .unwrap();

    // Three sessions of steady progress
    for (day, count, rpe) in [(1, 10, 7.0), (2, 12, 7.5), (3, 15, 8.5)] {
        db.add_record(
            NewRecord::new("Squats", count)
                .on(date(2024, 1, day))
                .at(morning())
                .with_rpe(Rpe::new(rpe).unwrap())
                .with_weight(60.0, WeightUnit::Kg),
        )
        .unwrap();
    }

    let stats = db.get_exercise_stats("Squats").unwrap();
    assert_eq!(stats.total_workouts, 3);
    assert!((stats.average_count - 37.0 / 3.0).abs() < 1e-9);
    assert!((stats.improvement - 50.0).abs() < 1e-9);
    assert_eq!(stats.first_workout.unwrap().date, date(2024, 1, 1));
    assert_eq!(stats.last_workout.unwrap().date, date(2024, 1, 3));

    // Deleting the exercise takes its records with it
    let removed = db.delete_exercise("Squats").unwrap();
    assert_eq!(removed, 3);
    assert!(db.get_exercise("Squats").unwrap().is_none());
    assert!(db.get_records_by_exercise("Squats").unwrap().is_empty());
    assert!(db.get_exercise_stats("Squats").unwrap().is_empty());
}

#[test]
fn test_date_range_boundaries() {
    let db = Database::open_in_memory().unwrap();
    for day in [date(2023, 12, 31), date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)] {
        db.add_record(NewRecord::new("Running", 1800).on(day).at(morning()))
            .unwrap();
    }

    let dates: Vec<NaiveDate> = db
        .get_records_by_date_range(date(2024, 1, 1), date(2024, 1, 3))
        .unwrap()
        .into_iter()
        .map(|r| r.date)
        .collect();

    assert_eq!(dates, [date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
}

#[test]
fn test_rename_collision_changes_nothing() {
    let db = Database::open_in_memory().unwrap();
    let squats = Exercise::new("Squats", ExerciseSpec::Strength { sets: 3, reps: 10 });
    let plank = Exercise::new("Plank", ExerciseSpec::Core { seconds: 60 });
    db.add_exercise(&squats).unwrap();
    db.add_exercise(&plank).unwrap();
    db.add_record(NewRecord::new("Squats", 10)).unwrap();

    let result = db.update_exercise("Squats", &Exercise::new("Plank", squats.spec));

    assert!(matches!(result, Err(DatabaseError::ConstraintViolation(_))));
    assert_eq!(db.get_exercise("Squats").unwrap(), Some(squats));
    assert_eq!(db.get_exercise("Plank").unwrap(), Some(plank));
    assert_eq!(db.get_records_by_exercise("Squats").unwrap().len(), 1);
}

#[test]
fn test_count_arrives_as_text() {
    let db = Database::open_in_memory().unwrap();

    let record: NewRecord =
        serde_json::from_str(r#"{"exerciseName":"Plank","count":"45"}"#).unwrap();
    let id = db.add_record(record).unwrap();
    assert_eq!(db.get_record(id).unwrap().unwrap().count, 45);

    assert!(serde_json::from_str::<NewRecord>(r#"{"exerciseName":"Plank","count":"lots"}"#).is_err());
}

#[test]
fn test_exercise_json_shape() {
    let exercise: Exercise = serde_json::from_str(
        r#"{"name":"Running","type":"cardio","defaultCount":"1800","instruction":""}"#,
    )
    .unwrap();
    assert_eq!(exercise.spec, ExerciseSpec::Cardio { seconds: 1800 });

    let bad = serde_json::from_str::<Exercise>(
        r#"{"name":"Squats","type":"strength","defaultCount":"ten"}"#,
    );
    assert!(bad.is_err());
}
