//! Application configuration and user preferences.
//!
//! Two pieces of state live outside the database:
//! - `config.toml`: how the store is opened and validated.
//! - the preferences blob: a single JSON object saved under a fixed key,
//!   read once at startup and handed to whoever needs it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::exercises::ExerciseCatalog;

/// Fixed key the preferences blob is stored under.
pub const PREFERENCES_KEY: &str = "workout-settings";

/// Storage backend preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageType {
    /// Local database (the only implemented backend)
    #[default]
    LocalStorage,
    /// Remote database placeholder; selecting it has no effect yet
    Postgres,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::LocalStorage => write!(f, "Local storage"),
            StorageType::Postgres => write!(f, "PostgreSQL"),
        }
    }
}

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme (default)
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "Light"),
            Theme::Dark => write!(f, "Dark"),
        }
    }
}

/// User preferences persisted as one JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub storage_type: StorageType,
    pub theme: Theme,
    /// Connection string for the remote backend placeholder
    pub postgres_url: String,
}

impl Preferences {
    pub fn to_blob(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    pub fn from_blob(blob: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(blob).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Validation rules the store applies on writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorePolicy {
    /// Exercise types accepted by this deployment
    pub exercise_catalog: ExerciseCatalog,
    /// Reject plans without exercises
    pub require_plan_exercises: bool,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            exercise_catalog: ExerciseCatalog::Classic,
            require_plan_exercises: true,
        }
    }
}

/// Database-related settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// File name inside the data directory
    pub file_name: String,
    /// Remove records of deleted exercises when the store opens
    pub sweep_orphans_on_open: bool,
    /// Populate an empty database with sample data
    pub seed_sample_data: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            file_name: "workouts.db".to_string(),
            sweep_orphans_on_open: true,
            seed_sample_data: false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Database settings
    pub database: DatabaseSettings,
    /// Store validation policy
    pub policy: StorePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            database: DatabaseSettings::default(),
            policy: StorePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Full path of the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database.file_name)
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "workout-tracker", "WorkoutTracker")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Get the preferences blob path inside `data_dir`.
pub fn get_preferences_path(data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{}.json", PREFERENCES_KEY))
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load application configuration from `path`. A missing file yields the
/// defaults with `data_dir` set to the file's directory.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let data_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if !path.exists() {
        return Ok(AppConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = data_dir;

    Ok(config)
}

/// Save application configuration to `path`.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Load preferences from `data_dir`. A missing blob gives the defaults; an
/// unreadable one is logged and replaced by the defaults.
pub fn load_preferences(data_dir: &Path) -> Result<Preferences, ConfigError> {
    let path = get_preferences_path(data_dir);

    if !path.exists() {
        return Ok(Preferences::default());
    }

    let blob = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    match Preferences::from_blob(&blob) {
        Ok(preferences) => Ok(preferences),
        Err(e) => {
            tracing::warn!("Ignoring unreadable preferences at {}: {}", path.display(), e);
            Ok(Preferences::default())
        }
    }
}

/// Save preferences into `data_dir`.
pub fn save_preferences(preferences: &Preferences, data_dir: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(data_dir).map_err(|e| ConfigError::IoError(e.to_string()))?;
    std::fs::write(get_preferences_path(data_dir), preferences.to_blob()?)
        .map_err(|e| ConfigError::IoError(e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
