//! Per-exercise statistics derived from logged records.

use serde::{Deserialize, Serialize};

use super::types::ExerciseRecord;
use crate::exercises::Exercise;

/// Aggregate over every record of one exercise.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseStats {
    pub total_workouts: usize,
    pub average_count: f64,
    pub max_count: u32,
    pub min_count: u32,
    /// Earliest record by (date, time, id)
    pub first_workout: Option<ExerciseRecord>,
    /// Latest record by (date, time, id)
    pub last_workout: Option<ExerciseRecord>,
    /// Percentage gain from the first record's count to the best count
    pub improvement: f64,
    /// Mean RPE over records that carry one
    pub average_rpe: Option<f64>,
}

impl ExerciseStats {
    /// Compute stats over a set of records. An empty slice gives the empty
    /// stats value (all zeros, no first/last workout).
    pub fn from_records(records: &[ExerciseRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let total = records.len();
        let sum: u64 = records.iter().map(|r| r.count as u64).sum();
        let max_count = records.iter().map(|r| r.count).max().unwrap_or(0);
        let min_count = records.iter().map(|r| r.count).min().unwrap_or(0);

        let chronological = |r: &&ExerciseRecord| (r.date, r.time, r.id);
        let first = records.iter().min_by_key(chronological);
        let last = records.iter().max_by_key(chronological);

        let improvement = first
            .map(|r| improvement_percent(r.count, max_count))
            .unwrap_or(0.0);

        let rpes: Vec<f64> = records
            .iter()
            .filter_map(|r| r.rpe.map(|rpe| rpe.value()))
            .collect();
        let average_rpe = if rpes.is_empty() {
            None
        } else {
            Some(rpes.iter().sum::<f64>() / rpes.len() as f64)
        };

        Self {
            total_workouts: total,
            average_count: sum as f64 / total as f64,
            max_count,
            min_count,
            first_workout: first.cloned(),
            last_workout: last.cloned(),
            improvement,
            average_rpe,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_workouts == 0
    }
}

/// Gain from `first` to `best` in percent. A zero baseline has no
/// meaningful percentage and reports 0.
fn improvement_percent(first: u32, best: u32) -> f64 {
    if first == 0 || best <= first {
        return 0.0;
    }
    (best - first) as f64 / first as f64 * 100.0
}

/// An exercise joined with its statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseWithStats {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub stats: ExerciseStats,
}
