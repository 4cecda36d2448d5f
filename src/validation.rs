//! Input validation errors shared by the domain types and the store.
//!
//! Every variant is raised before anything is written.

use thiserror::Error;

/// Reasons an input is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("Invalid schedule '{0}': expected 7 characters of '0' or '1'")]
    InvalidSchedule(String),

    #[error("Invalid default count '{value}' for {exercise_type} exercise")]
    InvalidDefaultCount { exercise_type: String, value: String },

    #[error("Unknown exercise type: {0}")]
    UnknownExerciseType(String),

    #[error("Exercise type {exercise_type} is not part of the {catalog} catalog")]
    CatalogMismatch {
        exercise_type: String,
        catalog: String,
    },

    #[error("RPE must be between 1 and 10 in steps of 0.5, got {0}")]
    InvalidRpe(f64),

    #[error("Weight must be a finite non-negative number, got {0}")]
    InvalidWeight(f64),

    #[error("{exercise} is a {exercise_type} exercise and takes no weight")]
    WeightNotApplicable {
        exercise: String,
        exercise_type: String,
    },

    #[error("Invalid count '{0}': expected a non-negative integer")]
    InvalidCount(String),

    #[error("Invalid plan count {0}: expected -1 or a non-negative integer")]
    InvalidPlanCount(i64),

    #[error("A plan needs at least one exercise")]
    EmptyPlan,

    #[error("Invalid date range: {start} is after {end}")]
    InvertedDateRange { start: String, end: String },

    #[error("Exercise position {index} is out of range for a plan of {len}")]
    PositionOutOfRange { index: usize, len: usize },
}
