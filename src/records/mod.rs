//! Workout records and derived statistics.

pub mod stats;
pub mod types;

pub use stats::{ExerciseStats, ExerciseWithStats};
pub use types::{
    parse_count, ExerciseRecord, NewRecord, RecordPatch, Rpe, WeightUnit, DATE_FORMAT, TIME_FORMAT,
};
