//! Workout plan types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schedule::Schedule;
use crate::validation::ValidationError;

/// Quantity for an exercise inside a plan. Stored as `-1` for
/// [`PlanCount::Default`], otherwise the override itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PlanCount {
    /// Use the exercise's own default count
    #[default]
    Default,
    /// Fixed quantity for this plan
    Override(u32),
}

impl TryFrom<i64> for PlanCount {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(PlanCount::Default),
            n if n >= 0 => u32::try_from(n)
                .map(PlanCount::Override)
                .map_err(|_| ValidationError::InvalidPlanCount(value)),
            _ => Err(ValidationError::InvalidPlanCount(value)),
        }
    }
}

impl From<PlanCount> for i64 {
    fn from(count: PlanCount) -> Self {
        match count {
            PlanCount::Default => -1,
            PlanCount::Override(n) => n as i64,
        }
    }
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanExercise {
    pub name: String,
    #[serde(default)]
    pub count: PlanCount,
}

impl PlanExercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: PlanCount::Default,
        }
    }

    pub fn with_count(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count: PlanCount::Override(count),
        }
    }
}

/// A stored plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i64,
    pub name: String,
    /// Performed in this order
    pub exercises: Vec<PlanExercise>,
    pub schedule: Schedule,
    pub created_at: DateTime<Utc>,
    /// Unset until the first update
    pub updated_at: Option<DateTime<Utc>>,
}

impl Plan {
    /// Move the exercise at `from` to position `to`, shifting the rest.
    pub fn move_exercise(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        let len = self.exercises.len();
        for index in [from, to] {
            if index >= len {
                return Err(ValidationError::PositionOutOfRange { index, len });
            }
        }
        let exercise = self.exercises.remove(from);
        self.exercises.insert(to, exercise);
        Ok(())
    }

    /// Names referenced by this plan, in order.
    pub fn exercise_names(&self) -> impl Iterator<Item = &str> {
        self.exercises.iter().map(|e| e.name.as_str())
    }
}

/// Input for creating a plan. The schedule is kept as text so malformed
/// values are rejected by the store before anything is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlan {
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<PlanExercise>,
    pub schedule: String,
}

impl NewPlan {
    pub fn new(name: impl Into<String>, schedule: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exercises: Vec::new(),
            schedule: schedule.into(),
        }
    }

    pub fn with_exercise(mut self, exercise: PlanExercise) -> Self {
        self.exercises.push(exercise);
        self
    }

    /// Check every constraint and return the parsed schedule.
    pub fn validate(&self, require_exercises: bool) -> Result<Schedule, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("Plan name"));
        }
        validate_exercises(&self.exercises, require_exercises)?;
        Schedule::parse(&self.schedule)
    }
}

/// Fields to overwrite on an existing plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanPatch {
    pub name: Option<String>,
    pub exercises: Option<Vec<PlanExercise>>,
    pub schedule: Option<String>,
}

impl PlanPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Validate the provided fields and merge them over `plan`.
    pub fn apply_to(self, plan: &mut Plan, require_exercises: bool) -> Result<(), ValidationError> {
        let schedule = self.schedule.as_deref().map(Schedule::parse).transpose()?;

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyField("Plan name"));
            }
        }
        if let Some(exercises) = &self.exercises {
            validate_exercises(exercises, require_exercises)?;
        }

        if let Some(name) = self.name {
            plan.name = name;
        }
        if let Some(exercises) = self.exercises {
            plan.exercises = exercises;
        }
        if let Some(schedule) = schedule {
            plan.schedule = schedule;
        }
        Ok(())
    }
}

fn validate_exercises(
    exercises: &[PlanExercise],
    require_exercises: bool,
) -> Result<(), ValidationError> {
    if require_exercises && exercises.is_empty() {
        return Err(ValidationError::EmptyPlan);
    }
    if exercises.iter().any(|e| e.name.trim().is_empty()) {
        return Err(ValidationError::EmptyField("Plan exercise name"));
    }
    Ok(())
}
