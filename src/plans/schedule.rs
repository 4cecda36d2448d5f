//! Weekly schedule: seven '0'/'1' flags, Monday first.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Days of the week a plan is active on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Schedule([bool; 7]);

impl Schedule {
    /// Parse a string matching `^[01]{7}$`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let bytes = value.as_bytes();
        if bytes.len() != 7 {
            return Err(ValidationError::InvalidSchedule(value.to_string()));
        }

        let mut days = [false; 7];
        for (day, byte) in days.iter_mut().zip(bytes) {
            *day = match byte {
                b'0' => false,
                b'1' => true,
                _ => return Err(ValidationError::InvalidSchedule(value.to_string())),
            };
        }
        Ok(Self(days))
    }

    pub fn from_days(days: &[Weekday]) -> Self {
        let mut flags = [false; 7];
        for day in days {
            flags[day.num_days_from_monday() as usize] = true;
        }
        Self(flags)
    }

    /// Whether the plan runs on `day`. Sunday maps to the last position.
    pub fn is_active_on(&self, day: Weekday) -> bool {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn active_days(&self) -> usize {
        self.0.iter().filter(|&&d| d).count()
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for day in self.0 {
            f.write_str(if day { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Schedule {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Schedule::parse(s)
    }
}

impl TryFrom<String> for Schedule {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Schedule::parse(&value)
    }
}

impl From<Schedule> for String {
    fn from(schedule: Schedule) -> Self {
        schedule.to_string()
    }
}
