//! Integration test modules.

mod concurrency_test;
mod exercise_lifecycle_test;
mod persistence_test;
mod plan_schedule_test;
