//! Task and time-slot types consumed by the schedule optimizer.
//!
//! Both types are plain serde records supplied by the caller per optimization
//! request. The optimizer never mutates them; structural invariants are
//! checked fail-fast via [`Task::validate`] and [`TimeSlot::validate`] before
//! any fitness arithmetic runs.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Task priority, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Numeric value used by the fitness function (low=1 .. critical=4).
    pub fn value(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Critical => 4,
        }
    }

    /// Highest numeric priority value, used for normalization.
    pub const MAX_VALUE: u8 = 4;
}

/// Kind of work a task represents.
///
/// Switching between different categories carries a context-switch penalty
/// during fitness evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Creative,
    Analytical,
    Administrative,
    Communication,
    Learning,
}

/// A task to be placed into a time slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    pub category: TaskCategory,
    /// Estimated duration in minutes
    pub estimated_duration: u32,
    /// Deadline as a UTC instant
    pub deadline: DateTime<Utc>,
    /// Required energy on a 1-5 scale
    pub energy_required: u8,
    /// Required focus on a 1-5 scale
    pub focus_required: u8,
    /// Ids of tasks that must finish before this one starts
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Cognitive cost of switching into this task from another category (0-10)
    #[serde(default)]
    pub context_switch_cost: u8,
    /// Preferred hours of day (0-23); empty means no preference
    #[serde(default)]
    pub preferred_hours: Vec<u8>,
}

impl Task {
    /// Check structural invariants.
    ///
    /// The optimizer calls this for every task before scoring anything, so a
    /// malformed record is a hard error rather than a silent zero somewhere
    /// in the fitness arithmetic.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::InvalidTaskField {
                task_id: "<unknown>".to_string(),
                field: "id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.estimated_duration == 0 {
            return Err(self.field_error("estimated_duration", "must be positive"));
        }
        if !(1..=5).contains(&self.energy_required) {
            return Err(self.field_error("energy_required", "must be in 1..=5"));
        }
        if !(1..=5).contains(&self.focus_required) {
            return Err(self.field_error("focus_required", "must be in 1..=5"));
        }
        if let Some(hour) = self.preferred_hours.iter().find(|h| **h > 23) {
            return Err(self.field_error(
                "preferred_hours",
                &format!("hour {hour} is out of range 0..=23"),
            ));
        }
        Ok(())
    }

    fn field_error(&self, field: &str, message: &str) -> ValidationError {
        ValidationError::InvalidTaskField {
            task_id: self.id.clone(),
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// A free block of time the optimizer may assign a task to.
///
/// Slots are supplied externally, already free of other commitments; the
/// optimizer treats the slot list as fixed capacity, not a live calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
}

impl TimeSlot {
    /// Create a new time slot, rejecting zero durations.
    pub fn new(start_time: DateTime<Utc>, duration_minutes: u32) -> Result<Self, ValidationError> {
        let slot = Self {
            start_time,
            duration_minutes,
        };
        slot.validate()?;
        Ok(slot)
    }

    /// Check structural invariants (deserialized slots bypass [`TimeSlot::new`]).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_minutes == 0 {
            return Err(ValidationError::InvalidSlotDuration {
                start: self.start_time,
            });
        }
        Ok(())
    }

    /// End of the slot.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes as i64)
    }

    /// Hour of day (0-23) at which the slot starts.
    pub fn hour(&self) -> u8 {
        self.start_time.hour() as u8
    }

    /// Check if this slot can fit a task of given duration.
    pub fn can_fit(&self, minutes: u32) -> bool {
        self.duration_minutes >= minutes
    }
}
