//! Workout Tracker
//!
//! Opens the local database, applies the startup housekeeping configured in
//! `config.toml` and logs the plans scheduled for today.

use anyhow::Context;
use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use workout_tracker::storage::config::{load_config, load_preferences, StorageType};
use workout_tracker::storage::{seed_sample_data, Database};
use workout_tracker::PlanCount;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Workout Tracker v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("loading config.toml")?;
    let preferences = load_preferences(&config.data_dir).context("loading preferences")?;

    if preferences.storage_type == StorageType::Postgres {
        tracing::warn!("Remote database storage is not available, using the local database");
    }

    let db_path = config.database_path();
    let db = Database::open(&db_path)
        .with_context(|| format!("opening database at {}", db_path.display()))?
        .with_policy(config.policy.clone());

    if config.database.sweep_orphans_on_open {
        db.sweep_orphan_records()?;
    }

    if config.database.seed_sample_data {
        seed_sample_data(&db, Local::now().date_naive())?;
    }

    for (plan_id, name) in db.find_dangling_plan_references()? {
        tracing::warn!("Plan {} refers to missing exercise {}", plan_id, name);
    }

    let today = db.get_today_plans()?;
    if today.is_empty() {
        tracing::info!("No plans scheduled for today");
    }

    for plan in today {
        tracing::info!("Today: {}", plan.name);
        for step in &plan.exercises {
            let default_count = db
                .get_exercise(&step.name)?
                .map(|exercise| exercise.spec.default_count());

            match (step.count, default_count) {
                (PlanCount::Override(count), _) => tracing::info!("  {} x{}", step.name, count),
                (PlanCount::Default, Some(count)) => tracing::info!("  {} {}", step.name, count),
                (PlanCount::Default, None) => tracing::info!("  {}", step.name),
            }
        }
    }

    Ok(())
}
