//! Database connection, schema bootstrap and transaction scoping.
//!
//! A [`Database`] owns one SQLite connection behind a mutex. Every public
//! operation takes the lock, runs exactly one transaction and releases the
//! lock when the transaction ends, so no caller ever holds the connection
//! between operations. Reads run in deferred transactions and writes in
//! immediate ones.
//!
//! The collection-specific operations live next to this file
//! (`exercise_store`, `record_store`, `plan_store`, `stats_store`) as
//! further `impl Database` blocks.

use crate::storage::config::StorePolicy;
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use crate::validation::ValidationError;
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Mutex<Connection>,
    policy: StorePolicy,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        let db = Self {
            conn: Mutex::new(conn),
            policy: StorePolicy::default(),
        };
        db.initialize()?;

        Ok(db)
    }

    /// Replace the validation policy.
    pub fn with_policy(mut self, policy: StorePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &StorePolicy {
        &self.policy
    }

    /// Bring the schema up to [`CURRENT_VERSION`].
    fn initialize(&self) -> Result<(), DatabaseError> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        match Self::get_schema_version(&conn)? {
            version if version < CURRENT_VERSION => Self::migrate(&conn, version),
            _ => Ok(()),
        }
    }

    /// Highest applied schema version, 0 for a fresh file.
    fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .map_err(query_failed)
    }

    /// Run database migrations.
    fn migrate(conn: &Connection, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            conn.execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            conn.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                [CURRENT_VERSION],
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn
            .lock()
            .map_err(|_| DatabaseError::ConnectionFailed("connection lock poisoned".to_string()))
    }

    /// Run `f` inside a read transaction.
    pub(crate) fn read<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        self.run(TransactionBehavior::Deferred, f)
    }

    /// Run `f` inside a write transaction. Nothing is committed if `f` fails.
    pub(crate) fn write<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        self.run(TransactionBehavior::Immediate, f)
    }

    fn run<T>(
        &self,
        behavior: TransactionBehavior,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(behavior)
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        // Dropping an uncommitted transaction rolls it back
        let value = f(&tx)?;

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(value)
    }

    /// Count rows in one of the collection tables.
    pub(crate) fn count_rows(&self, table: Table) -> Result<usize, DatabaseError> {
        self.read(|tx| {
            let count: i64 = tx
                .query_row(&format!("SELECT COUNT(*) FROM {}", table.name()), [], |row| {
                    row.get(0)
                })
                .map_err(query_failed)?;
            Ok(count as usize)
        })
    }
}

/// The three collection tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Table {
    Exercises,
    Records,
    Plans,
}

impl Table {
    fn name(&self) -> &'static str {
        match self {
            Table::Exercises => "exercises",
            Table::Records => "records",
            Table::Plans => "plans",
        }
    }
}

/// Map a SQLite error, separating constraint failures (unique names,
/// CHECK clauses) from everything else.
pub(crate) fn query_failed(e: rusqlite::Error) -> DatabaseError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _) if err.code == ErrorCode::ConstraintViolation => {
            DatabaseError::ConstraintViolation(e.to_string())
        }
        _ => DatabaseError::QueryFailed(e.to_string()),
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}
