//! Integration tests for concurrent access to one store.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use workout_tracker::{Database, Exercise, ExerciseSpec, NewRecord};

#[test]
fn test_concurrent_record_ids_are_distinct() {
    let db = Arc::new(Database::open_in_memory().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                let mut ids = Vec::new();
                for count in 0..25 {
                    ids.push(db.add_record(NewRecord::new("Squats", worker * 100 + count)).unwrap());
                }
                ids
            })
        })
        .collect();

    let mut all_ids = Vec::new();
    for handle in handles {
        let ids = handle.join().unwrap();
        // Each writer sees its own ids increase
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        all_ids.extend(ids);
    }

    let unique: HashSet<i64> = all_ids.iter().copied().collect();
    assert_eq!(unique.len(), 100);
    assert_eq!(db.count_records().unwrap(), 100);
}

#[test]
fn test_cascade_delete_races_with_reads() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    db.add_exercise(&Exercise::new("Squats", ExerciseSpec::Strength { sets: 3, reps: 10 }))
        .unwrap();
    for count in 0..50 {
        db.add_record(NewRecord::new("Squats", count)).unwrap();
    }

    let reader = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            for _ in 0..20 {
                // A reader sees either all records or none, never a partial delete
                let len = db.get_records_by_exercise("Squats").unwrap().len();
                assert!(len == 50 || len == 0, "saw {} records", len);
            }
        })
    };

    assert_eq!(db.delete_exercise("Squats").unwrap(), 50);
    reader.join().unwrap();
    assert_eq!(db.count_records().unwrap(), 0);
}
