//! Integration tests for the file-backed store and startup configuration.

use chrono::NaiveDate;
use tempfile::TempDir;
use workout_tracker::storage::config::{
    load_config_from, load_preferences, save_config_to, save_preferences, AppConfig,
    Preferences, Theme,
};
use workout_tracker::storage::seed_sample_data;
use workout_tracker::{Database, Exercise, ExerciseCatalog, ExerciseSpec, NewPlan, NewRecord, PlanExercise};

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("workouts.db");

    let record_id = {
        let db = Database::open(&path).unwrap();
        db.add_exercise(&Exercise::new("Plank", ExerciseSpec::Core { seconds: 60 }))
            .unwrap();
        db.add_plan(NewPlan::new("Core", "1111100").with_exercise(PlanExercise::new("Plank")))
            .unwrap();
        db.add_record(NewRecord::new("Plank", 75)).unwrap()
    };

    let db = Database::open(&path).unwrap();
    assert_eq!(db.count_exercises().unwrap(), 1);
    assert_eq!(db.get_record(record_id).unwrap().unwrap().count, 75);
    assert!(db.get_plan_by_name("Core").unwrap().is_some());

    // Ids keep increasing across sessions
    let next = db.add_record(NewRecord::new("Plank", 80)).unwrap();
    assert!(next > record_id);
}

#[test]
fn test_config_drives_store_policy() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    let mut config = AppConfig::default();
    config.policy.exercise_catalog = ExerciseCatalog::Measured;
    save_config_to(&config, &config_path).unwrap();

    let loaded = load_config_from(&config_path).unwrap();
    let db = Database::open(&loaded.database_path())
        .unwrap()
        .with_policy(loaded.policy.clone());

    assert!(db
        .add_exercise(&Exercise::new("Rows", ExerciseSpec::Weight { sets: 3, reps: 8 }))
        .is_ok());
    assert!(db
        .add_exercise(&Exercise::new("Running", ExerciseSpec::Cardio { seconds: 600 }))
        .is_err());
    assert!(dir.path().join("workouts.db").exists());
}

#[test]
fn test_preferences_persist_next_to_database() {
    let dir = TempDir::new().unwrap();
    assert_eq!(load_preferences(dir.path()).unwrap(), Preferences::default());

    let prefs = Preferences {
        theme: Theme::Dark,
        ..Default::default()
    };
    save_preferences(&prefs, dir.path()).unwrap();

    assert_eq!(load_preferences(dir.path()).unwrap().theme, Theme::Dark);
}

#[test]
fn test_seeded_database_reopens_clean() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("workouts.db");
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let summary = {
        let db = Database::open(&path).unwrap();
        seed_sample_data(&db, today).unwrap()
    };

    let db = Database::open(&path).unwrap();
    assert_eq!(db.sweep_orphan_records().unwrap(), 0);
    assert_eq!(db.count_records().unwrap(), summary.records);
    assert_eq!(db.get_exercises_with_stats().unwrap().len(), summary.exercises);
}
