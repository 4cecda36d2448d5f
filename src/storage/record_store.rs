//! Record operations and date range queries.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, ToSql};

use crate::records::{ExerciseRecord, NewRecord, RecordPatch, Rpe, WeightUnit, DATE_FORMAT, TIME_FORMAT};
use crate::storage::database::{query_failed, Database, DatabaseError, Table};
use crate::storage::exercise_store::find_exercise;
use crate::validation::ValidationError;

pub(crate) const SELECT_RECORD: &str =
    "SELECT id, exercise_name, date, time, count, rpe, note, weight, unit FROM records";

impl Database {
    // ========== Record CRUD Operations ==========

    /// Log a record and return its store-assigned id. Missing date and time
    /// default to the current local date and time. A weight is refused when
    /// the exercise exists and its type takes none.
    pub fn add_record(&self, record: NewRecord) -> Result<i64, DatabaseError> {
        record.validate()?;
        let record = record.into_record(0);

        let id = self.write(|tx| {
            check_weight_applies(tx, &record)?;
            tx.execute(
                "INSERT INTO records (exercise_name, date, time, count, rpe, note, weight, unit)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.exercise_name,
                    record.date.format(DATE_FORMAT).to_string(),
                    record.time.format(TIME_FORMAT).to_string(),
                    record.count,
                    record.rpe.map(|r| r.value()),
                    record.note,
                    record.weight,
                    record.unit.map(|u| u.as_str()),
                ],
            )
            .map_err(query_failed)?;
            Ok(tx.last_insert_rowid())
        })?;

        tracing::debug!("Logged record {} for {}", id, record.exercise_name);
        Ok(id)
    }

    /// Get a record by id.
    pub fn get_record(&self, id: i64) -> Result<Option<ExerciseRecord>, DatabaseError> {
        self.read(|tx| find_record(tx, id))
    }

    /// All records for one exercise, looked up through the name index.
    pub fn get_records_by_exercise(
        &self,
        exercise_name: &str,
    ) -> Result<Vec<ExerciseRecord>, DatabaseError> {
        self.read(|tx| {
            query_records(
                tx,
                &format!("{} WHERE exercise_name = ?1 ORDER BY id", SELECT_RECORD),
                &[&exercise_name],
            )
        })
    }

    /// Records dated within `[start, end]`, both ends included. An empty
    /// result is not an error; `start` after `end` is.
    pub fn get_records_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ExerciseRecord>, DatabaseError> {
        if start > end {
            return Err(ValidationError::InvertedDateRange {
                start: start.to_string(),
                end: end.to_string(),
            }
            .into());
        }

        let start = start.format(DATE_FORMAT).to_string();
        let end = end.format(DATE_FORMAT).to_string();

        self.read(|tx| {
            query_records(
                tx,
                &format!(
                    "{} WHERE date BETWEEN ?1 AND ?2 ORDER BY date, time, id",
                    SELECT_RECORD
                ),
                &[&start, &end],
            )
        })
    }

    /// All records in insertion order.
    pub fn get_all_records(&self) -> Result<Vec<ExerciseRecord>, DatabaseError> {
        self.read(|tx| query_records(tx, &format!("{} ORDER BY id", SELECT_RECORD), &[]))
    }

    /// Delete a record by id. Deleting an id that does not exist is a no-op.
    pub fn delete_record(&self, id: i64) -> Result<(), DatabaseError> {
        let removed = self.write(|tx| {
            tx.execute("DELETE FROM records WHERE id = ?1", params![id])
                .map_err(query_failed)
        })?;

        if removed == 0 {
            tracing::debug!("Record {} already absent", id);
        }
        Ok(())
    }

    /// Merge `patch` over the stored record and persist it.
    pub fn update_record(
        &self,
        id: i64,
        patch: RecordPatch,
    ) -> Result<ExerciseRecord, DatabaseError> {
        self.write(|tx| {
            let mut record = find_record(tx, id)?
                .ok_or_else(|| DatabaseError::NotFound(format!("Record {}", id)))?;

            record.apply(patch);
            record.validate()?;
            check_weight_applies(tx, &record)?;

            tx.execute(
                "UPDATE records SET exercise_name = ?2, date = ?3, time = ?4, count = ?5,
                 rpe = ?6, note = ?7, weight = ?8, unit = ?9 WHERE id = ?1",
                params![
                    record.id,
                    record.exercise_name,
                    record.date.format(DATE_FORMAT).to_string(),
                    record.time.format(TIME_FORMAT).to_string(),
                    record.count,
                    record.rpe.map(|r| r.value()),
                    record.note,
                    record.weight,
                    record.unit.map(|u| u.as_str()),
                ],
            )
            .map_err(query_failed)?;

            Ok(record)
        })
    }

    /// Empty the record collection only.
    pub fn clear_all_records(&self) -> Result<(), DatabaseError> {
        self.write(|tx| {
            tx.execute("DELETE FROM records", []).map_err(query_failed)?;
            Ok(())
        })?;

        tracing::info!("Cleared all records");
        Ok(())
    }

    /// Count records in the database.
    pub fn count_records(&self) -> Result<usize, DatabaseError> {
        self.count_rows(Table::Records)
    }
}

fn check_weight_applies(conn: &Connection, record: &ExerciseRecord) -> Result<(), DatabaseError> {
    if record.weight.is_none() {
        return Ok(());
    }

    if let Some(exercise) = find_exercise(conn, &record.exercise_name)? {
        let exercise_type = exercise.exercise_type();
        if !exercise_type.is_weighted() {
            return Err(ValidationError::WeightNotApplicable {
                exercise: exercise.name,
                exercise_type: exercise_type.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

pub(crate) fn find_record(conn: &Connection, id: i64) -> Result<Option<ExerciseRecord>, DatabaseError> {
    let result = conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_RECORD),
        params![id],
        RecordRow::from_row,
    );

    match result {
        Ok(row) => Ok(Some(row.into_record()?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(query_failed(e)),
    }
}

pub(crate) fn query_records(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<ExerciseRecord>, DatabaseError> {
    let mut stmt = conn.prepare(sql).map_err(query_failed)?;
    let rows = stmt.query_map(params, RecordRow::from_row).map_err(query_failed)?;

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(query_failed)?;
        records.push(row.into_record()?);
    }
    Ok(records)
}

/// Intermediate struct for reading record rows from database.
struct RecordRow {
    id: i64,
    exercise_name: String,
    date: String,
    time: String,
    count: u32,
    rpe: Option<f64>,
    note: Option<String>,
    weight: Option<f64>,
    unit: Option<String>,
}

impl RecordRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            exercise_name: row.get(1)?,
            date: row.get(2)?,
            time: row.get(3)?,
            count: row.get(4)?,
            rpe: row.get(5)?,
            note: row.get(6)?,
            weight: row.get(7)?,
            unit: row.get(8)?,
        })
    }

    fn into_record(self) -> Result<ExerciseRecord, DatabaseError> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            DatabaseError::DeserializationError(format!("Invalid record date: {}", e))
        })?;

        // Older rows may carry seconds
        let time = NaiveTime::parse_from_str(&self.time, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&self.time, "%H:%M:%S"))
            .map_err(|e| {
                DatabaseError::DeserializationError(format!("Invalid record time: {}", e))
            })?;

        let rpe = self
            .rpe
            .map(Rpe::new)
            .transpose()
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        let unit = match self.unit {
            Some(unit) => Some(WeightUnit::parse(&unit).ok_or_else(|| {
                DatabaseError::DeserializationError(format!("Unknown weight unit: {}", unit))
            })?),
            None => None,
        };

        Ok(ExerciseRecord {
            id: self.id,
            exercise_name: self.exercise_name,
            date,
            time,
            count: self.count,
            rpe,
            note: self.note,
            weight: self.weight,
            unit,
        })
    }
}
