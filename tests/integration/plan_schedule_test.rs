//! Integration tests for plans and weekly schedules.

use chrono::Weekday;
use workout_tracker::{
    Database, DatabaseError, NewPlan, PlanCount, PlanExercise, PlanPatch, ValidationError,
};

fn midweek() -> NewPlan {
    NewPlan::new("Midweek", "0010000")
        .with_exercise(PlanExercise::new("Squats"))
        .with_exercise(PlanExercise::with_count("Push-ups", 25))
}

#[test]
fn test_invalid_schedule_leaves_plans_unchanged() {
    let db = Database::open_in_memory().unwrap();
    db.add_plan(midweek()).unwrap();
    let before = db.get_all_plans().unwrap();

    let result = db.add_plan(
        NewPlan::new("Broken", "12345678").with_exercise(PlanExercise::new("Squats")),
    );

    assert!(matches!(
        result,
        Err(DatabaseError::Validation(ValidationError::InvalidSchedule(_)))
    ));
    assert_eq!(db.get_all_plans().unwrap(), before);
}

#[test]
fn test_wednesday_plan_only_on_wednesday() {
    let db = Database::open_in_memory().unwrap();
    db.add_plan(midweek()).unwrap();

    for day in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        let plans = db.get_plans_for_weekday(day).unwrap();
        if day == Weekday::Wed {
            assert_eq!(plans.len(), 1);
            assert_eq!(plans[0].name, "Midweek");
        } else {
            assert!(plans.is_empty(), "unexpected plan on {}", day);
        }
    }
}

#[test]
fn test_rename_twice_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    let plan = db.add_plan(midweek()).unwrap();

    let first = db.update_plan(plan.id, PlanPatch::rename("Hump day")).unwrap();
    let second = db.update_plan(plan.id, PlanPatch::rename("Hump day")).unwrap();

    assert_eq!(first.name, second.name);
    assert_eq!(first.exercises, second.exercises);
    assert_eq!(first.schedule, second.schedule);
    assert_eq!(first.created_at, second.created_at);
    assert_eq!(db.get_all_plans().unwrap().len(), 1);
}

#[test]
fn test_plan_counts_serialize_as_numbers() {
    let db = Database::open_in_memory().unwrap();
    let plan = db.add_plan(midweek()).unwrap();

    let json = serde_json::to_value(&plan.exercises).unwrap();
    assert_eq!(json[0]["count"], -1);
    assert_eq!(json[1]["count"], 25);

    let stored = db.get_plan(plan.id).unwrap().unwrap();
    assert_eq!(stored.exercises[0].count, PlanCount::Default);
}

#[test]
fn test_reorder_and_save() {
    let db = Database::open_in_memory().unwrap();
    let mut plan = db.add_plan(midweek()).unwrap();

    plan.move_exercise(1, 0).unwrap();
    let updated = db
        .update_plan(
            plan.id,
            PlanPatch {
                exercises: Some(plan.exercises.clone()),
                ..Default::default()
            },
        )
        .unwrap();

    let names: Vec<&str> = updated.exercise_names().collect();
    assert_eq!(names, ["Push-ups", "Squats"]);
}
