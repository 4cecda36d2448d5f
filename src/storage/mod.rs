//! Storage module for the database and configuration.

pub mod config;
pub mod database;
mod exercise_store;
mod plan_store;
mod record_store;
pub mod sample;
pub mod schema;
mod stats_store;

pub use config::{AppConfig, ConfigError, Preferences, StorageType, StorePolicy, Theme};
pub use database::{Database, DatabaseError};
pub use sample::{seed_sample_data, SeedSummary};
