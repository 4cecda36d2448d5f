//! Logged workout records.

use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::ValidationError;

/// Storage format for record dates. Sorts lexicographically in date order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format for record times.
pub const TIME_FORMAT: &str = "%H:%M";

/// Unit for a lifted weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "kg" => Some(WeightUnit::Kg),
            "lbs" => Some(WeightUnit::Lbs),
            _ => None,
        }
    }
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rate of Perceived Exertion, 1 to 10 in half steps.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rpe(f64);

impl Rpe {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        let in_range = (1.0..=10.0).contains(&value);
        let half_step = (value * 2.0).fract() == 0.0;
        if in_range && half_step {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidRpe(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rpe {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Rpe::new(value)
    }
}

impl From<Rpe> for f64 {
    fn from(rpe: Rpe) -> Self {
        rpe.0
    }
}

/// Parse a performed count given as text (form inputs send strings).
pub fn parse_count(value: &str) -> Result<u32, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidCount(value.to_string()))
}

/// Accept a count either as a JSON number or as a numeric string.
fn count_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Number(u32),
        Text(String),
    }

    match RawCount::deserialize(deserializer)? {
        RawCount::Number(count) => Ok(count),
        RawCount::Text(text) => parse_count(&text).map_err(serde::de::Error::custom),
    }
}

/// A stored workout record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    /// Store-assigned identifier
    pub id: i64,
    /// Name of the exercise performed
    pub exercise_name: String,
    /// Day performed
    pub date: NaiveDate,
    /// Time of day performed
    pub time: NaiveTime,
    /// Reps or seconds performed
    pub count: u32,
    pub rpe: Option<Rpe>,
    pub note: Option<String>,
    pub weight: Option<f64>,
    pub unit: Option<WeightUnit>,
}

impl ExerciseRecord {
    /// Apply a patch in place. The id never changes.
    pub fn apply(&mut self, patch: RecordPatch) {
        if let Some(exercise_name) = patch.exercise_name {
            self.exercise_name = exercise_name;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(count) = patch.count {
            self.count = count;
        }
        if let Some(rpe) = patch.rpe {
            self.rpe = rpe;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        self.time = truncate_to_minute(self.time);
    }

    /// Check the fields a patch can break.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.exercise_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("Exercise name"));
        }
        validate_weight(self.weight)
    }
}

/// Input for logging a new record. There is no id: the store assigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub exercise_name: String,
    /// Defaults to today (local time) when absent
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Defaults to the current local time when absent
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(deserialize_with = "count_from_number_or_string")]
    pub count: u32,
    #[serde(default)]
    pub rpe: Option<Rpe>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub unit: Option<WeightUnit>,
}

impl NewRecord {
    pub fn new(exercise_name: impl Into<String>, count: u32) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            date: None,
            time: None,
            count,
            rpe: None,
            note: None,
            weight: None,
            unit: None,
        }
    }

    /// Build a record whose count arrives as text.
    pub fn from_count_str(
        exercise_name: impl Into<String>,
        count: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(exercise_name, parse_count(count)?))
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_rpe(mut self, rpe: Rpe) -> Self {
        self.rpe = Some(rpe);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_weight(mut self, weight: f64, unit: WeightUnit) -> Self {
        self.weight = Some(weight);
        self.unit = Some(unit);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.exercise_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("Exercise name"));
        }
        validate_weight(self.weight)
    }

    /// Resolve defaults against the current local clock. Times are kept to
    /// the minute, matching their stored form.
    pub fn into_record(self, id: i64) -> ExerciseRecord {
        let now = Local::now();
        ExerciseRecord {
            id,
            exercise_name: self.exercise_name,
            date: self.date.unwrap_or_else(|| now.date_naive()),
            time: truncate_to_minute(self.time.unwrap_or_else(|| now.time())),
            count: self.count,
            rpe: self.rpe,
            note: self.note,
            weight: self.weight,
            unit: self.unit,
        }
    }
}

fn validate_weight(weight: Option<f64>) -> Result<(), ValidationError> {
    match weight {
        Some(w) if !w.is_finite() || w < 0.0 => Err(ValidationError::InvalidWeight(w)),
        _ => Ok(()),
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Fields to overwrite on an existing record. `None` leaves a field alone;
/// for nullable fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub exercise_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub count: Option<u32>,
    pub rpe: Option<Option<Rpe>>,
    pub note: Option<Option<String>>,
    pub weight: Option<Option<f64>>,
    pub unit: Option<Option<WeightUnit>>,
}
