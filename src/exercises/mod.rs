//! Exercise templates.

pub mod types;

pub use types::{Exercise, ExerciseCatalog, ExerciseSpec, ExerciseType};
