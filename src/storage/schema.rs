//! Database schema definitions.

/// SQL schema for the three collections. Every statement is idempotent.
pub const SCHEMA: &str = r#"
-- Exercises, keyed by name
CREATE TABLE IF NOT EXISTS exercises (
    name TEXT PRIMARY KEY NOT NULL,
    type TEXT NOT NULL,
    default_count TEXT NOT NULL,
    instruction TEXT
);

-- Records, store-assigned ids that are never reused
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    exercise_name TEXT NOT NULL,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    count INTEGER NOT NULL CHECK (count >= 0),
    rpe REAL CHECK (rpe IS NULL OR (rpe >= 1 AND rpe <= 10)),
    note TEXT,
    weight REAL,
    unit TEXT CHECK (unit IS NULL OR unit IN ('kg', 'lbs'))
);

CREATE INDEX IF NOT EXISTS idx_records_exercise_name ON records(exercise_name);
CREATE INDEX IF NOT EXISTS idx_records_date ON records(date);

-- Plans, unique by name
CREATE TABLE IF NOT EXISTS plans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    exercises_json TEXT NOT NULL,
    schedule TEXT NOT NULL CHECK (schedule GLOB '[01][01][01][01][01][01][01]'),
    created_at TEXT NOT NULL,
    updated_at TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_plans_name ON plans(name);
"#;

/// SQL for schema version tracking (migrations)
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;
