//! Weekly workout plans.

pub mod schedule;
pub mod types;

pub use schedule::Schedule;
pub use types::{NewPlan, Plan, PlanCount, PlanExercise, PlanPatch};
