//! Exercise types.
//!
//! An exercise's type decides how its default count is written: sets×reps
//! types use `<N>s<M>r` (for example `3s10r`), every other type a plain
//! integer. The pair is kept together in [`ExerciseSpec`] so a strength
//! exercise can never carry a seconds count and vice versa.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Exercise type as stored in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Strength,
    Cardio,
    Core,
    Weight,
    Timed,
    Count,
}

impl ExerciseType {
    /// Stable lowercase name used in storage and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Strength => "strength",
            ExerciseType::Cardio => "cardio",
            ExerciseType::Core => "core",
            ExerciseType::Weight => "weight",
            ExerciseType::Timed => "timed",
            ExerciseType::Count => "count",
        }
    }

    /// Parse a stored type name.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.to_lowercase().as_str() {
            "strength" => Ok(ExerciseType::Strength),
            "cardio" => Ok(ExerciseType::Cardio),
            "core" => Ok(ExerciseType::Core),
            "weight" => Ok(ExerciseType::Weight),
            "timed" => Ok(ExerciseType::Timed),
            "count" => Ok(ExerciseType::Count),
            _ => Err(ValidationError::UnknownExerciseType(value.to_string())),
        }
    }

    /// Whether the default count is a sets×reps pair.
    pub fn uses_sets_and_reps(&self) -> bool {
        matches!(self, ExerciseType::Strength | ExerciseType::Weight)
    }

    /// Whether records of this type may carry a weight. The store refuses a
    /// weighted record for any other type.
    pub fn is_weighted(&self) -> bool {
        self.uses_sets_and_reps()
    }

    /// The catalog this type belongs to.
    pub fn catalog(&self) -> ExerciseCatalog {
        match self {
            ExerciseType::Strength | ExerciseType::Cardio | ExerciseType::Core => {
                ExerciseCatalog::Classic
            }
            ExerciseType::Weight | ExerciseType::Timed | ExerciseType::Count => {
                ExerciseCatalog::Measured
            }
        }
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set of exercise types a deployment uses. The two catalogs are not
/// compatible and are never mixed in one database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCatalog {
    /// strength / cardio / core
    #[default]
    Classic,
    /// weight / timed / count
    Measured,
}

impl ExerciseCatalog {
    /// Reject types that belong to the other catalog.
    pub fn check(&self, exercise_type: ExerciseType) -> Result<(), ValidationError> {
        if exercise_type.catalog() == *self {
            Ok(())
        } else {
            Err(ValidationError::CatalogMismatch {
                exercise_type: exercise_type.to_string(),
                catalog: self.to_string(),
            })
        }
    }
}

impl std::fmt::Display for ExerciseCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseCatalog::Classic => write!(f, "classic"),
            ExerciseCatalog::Measured => write!(f, "measured"),
        }
    }
}

/// Exercise type together with its default quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseSpec {
    Strength { sets: u32, reps: u32 },
    Cardio { seconds: u32 },
    Core { seconds: u32 },
    Weight { sets: u32, reps: u32 },
    Timed { seconds: u32 },
    Count { reps: u32 },
}

impl ExerciseSpec {
    /// Build a spec from a type and its stored default count.
    pub fn parse(exercise_type: ExerciseType, default_count: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDefaultCount {
            exercise_type: exercise_type.to_string(),
            value: default_count.to_string(),
        };

        let trimmed = default_count.trim();
        let sets_reps = || parse_sets_reps(trimmed).ok_or_else(invalid);
        let quantity = || trimmed.parse::<u32>().map_err(|_| invalid());

        Ok(match exercise_type {
            ExerciseType::Strength => {
                let (sets, reps) = sets_reps()?;
                ExerciseSpec::Strength { sets, reps }
            }
            ExerciseType::Weight => {
                let (sets, reps) = sets_reps()?;
                ExerciseSpec::Weight { sets, reps }
            }
            ExerciseType::Cardio => ExerciseSpec::Cardio { seconds: quantity()? },
            ExerciseType::Core => ExerciseSpec::Core { seconds: quantity()? },
            ExerciseType::Timed => ExerciseSpec::Timed { seconds: quantity()? },
            ExerciseType::Count => ExerciseSpec::Count { reps: quantity()? },
        })
    }

    pub fn exercise_type(&self) -> ExerciseType {
        match self {
            ExerciseSpec::Strength { .. } => ExerciseType::Strength,
            ExerciseSpec::Cardio { .. } => ExerciseType::Cardio,
            ExerciseSpec::Core { .. } => ExerciseType::Core,
            ExerciseSpec::Weight { .. } => ExerciseType::Weight,
            ExerciseSpec::Timed { .. } => ExerciseType::Timed,
            ExerciseSpec::Count { .. } => ExerciseType::Count,
        }
    }

    /// Stored form of the default count (`3s10r` or `60`).
    pub fn default_count(&self) -> String {
        match self {
            ExerciseSpec::Strength { sets, reps } | ExerciseSpec::Weight { sets, reps } => {
                format!("{}s{}r", sets, reps)
            }
            ExerciseSpec::Cardio { seconds }
            | ExerciseSpec::Core { seconds }
            | ExerciseSpec::Timed { seconds } => seconds.to_string(),
            ExerciseSpec::Count { reps } => reps.to_string(),
        }
    }
}

fn parse_sets_reps(value: &str) -> Option<(u32, u32)> {
    let body = value.strip_suffix('r')?;
    let (sets, reps) = body.split_once('s')?;
    let sets = sets.parse().ok()?;
    let reps = reps.parse().ok()?;
    Some((sets, reps))
}

/// A named exercise template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExerciseJson", into = "ExerciseJson")]
pub struct Exercise {
    /// Unique name (primary key)
    pub name: String,
    /// Type and default quantity
    pub spec: ExerciseSpec,
    /// Optional how-to text
    pub instruction: Option<String>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, spec: ExerciseSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            instruction: None,
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn exercise_type(&self) -> ExerciseType {
        self.spec.exercise_type()
    }

    /// Check the fields the store relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("Exercise name"));
        }
        Ok(())
    }
}

/// JSON shape: `{ "name", "type", "defaultCount", "instruction" }`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseJson {
    name: String,
    #[serde(rename = "type")]
    exercise_type: ExerciseType,
    default_count: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instruction: Option<String>,
}

impl TryFrom<ExerciseJson> for Exercise {
    type Error = ValidationError;

    fn try_from(json: ExerciseJson) -> Result<Self, Self::Error> {
        Ok(Exercise {
            spec: ExerciseSpec::parse(json.exercise_type, &json.default_count)?,
            name: json.name,
            instruction: json.instruction,
        })
    }
}

impl From<Exercise> for ExerciseJson {
    fn from(exercise: Exercise) -> Self {
        ExerciseJson {
            exercise_type: exercise.exercise_type(),
            default_count: exercise.spec.default_count(),
            name: exercise.name,
            instruction: exercise.instruction,
        }
    }
}
