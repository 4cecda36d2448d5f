//! Workout Tracker - local exercise, record and plan storage
//!
//! Users define exercises, log the records of each workout and group
//! exercises into weekly plans. Everything is kept in a local SQLite
//! database behind [`Database`], which also derives per-exercise
//! statistics.

pub mod exercises;
pub mod plans;
pub mod records;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use exercises::{Exercise, ExerciseCatalog, ExerciseSpec, ExerciseType};
pub use plans::{NewPlan, Plan, PlanCount, PlanExercise, PlanPatch, Schedule};
pub use records::{ExerciseRecord, ExerciseStats, NewRecord, RecordPatch, Rpe, WeightUnit};
pub use storage::{Database, DatabaseError};
pub use validation::ValidationError;
