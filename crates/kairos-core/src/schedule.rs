//! Schedule result construction and summary statistics.
//!
//! Maps the best candidate found by the search back to an ordered schedule:
//! scheduled entries first (ascending start time), unscheduled entries
//! appended in original task order with a fixed reason string.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task, TaskCategory, TimeSlot};

/// Reason attached to every unscheduled entry.
pub const UNSCHEDULED_REASON: &str = "No compatible time slot could be found";

/// Where a task ended up in the produced schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Placement {
    Scheduled {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
    Unscheduled {
        reason: String,
    },
}

/// One entry of the produced schedule, echoing the task metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub task_id: String,
    pub task_title: String,
    pub priority: Priority,
    pub category: TaskCategory,
    pub duration_minutes: u32,
    pub energy_required: u8,
    pub focus_required: u8,
    #[serde(flatten)]
    pub placement: Placement,
}

impl ScheduleEntry {
    pub fn is_scheduled(&self) -> bool {
        matches!(self.placement, Placement::Scheduled { .. })
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        match self.placement {
            Placement::Scheduled { start_time, .. } => Some(start_time),
            Placement::Unscheduled { .. } => None,
        }
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        match self.placement {
            Placement::Scheduled { end_time, .. } => Some(end_time),
            Placement::Unscheduled { .. } => None,
        }
    }
}

/// Result of one `optimize` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Ordered schedule: scheduled entries first, then unscheduled
    pub schedule: Vec<ScheduleEntry>,
    /// Best fitness observed across all generations
    pub fitness_score: f64,
    pub stats: OptimizationStats,
}

/// Generation-by-generation observability for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationStats {
    pub generations: usize,
    pub final_fitness: f64,
    /// Best fitness per generation
    pub fitness_history: Vec<f64>,
    pub tasks_scheduled: usize,
    pub total_tasks: usize,
}

/// Build the ordered schedule from a candidate's genes.
///
/// Genes that are `None` or out of slot range become unscheduled entries.
pub fn build_schedule(
    genes: &[Option<usize>],
    tasks: &[Task],
    slots: &[TimeSlot],
) -> Vec<ScheduleEntry> {
    let mut scheduled = Vec::new();
    let mut unscheduled = Vec::new();

    for (task, gene) in tasks.iter().zip(genes.iter()) {
        match gene.and_then(|idx| slots.get(idx)) {
            Some(slot) => {
                let start_time = slot.start_time;
                let end_time = start_time + Duration::minutes(task.estimated_duration as i64);
                scheduled.push(entry(
                    task,
                    Placement::Scheduled {
                        start_time,
                        end_time,
                    },
                ));
            }
            None => unscheduled.push(entry(
                task,
                Placement::Unscheduled {
                    reason: UNSCHEDULED_REASON.to_string(),
                },
            )),
        }
    }

    scheduled.sort_by_key(|e| e.start_time());
    scheduled.extend(unscheduled);
    scheduled
}

fn entry(task: &Task, placement: Placement) -> ScheduleEntry {
    ScheduleEntry {
        task_id: task.id.clone(),
        task_title: task.title.clone(),
        priority: task.priority,
        category: task.category,
        duration_minutes: task.estimated_duration,
        energy_required: task.energy_required,
        focus_required: task.focus_required,
        placement,
    }
}

/// Aggregate view of a produced schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub scheduled_count: usize,
    pub unscheduled_count: usize,
    pub total_scheduled_minutes: u64,
    /// Scheduled minutes per task category
    pub minutes_by_category: HashMap<TaskCategory, u64>,
    /// Hour of day carrying the most scheduled minutes
    pub busiest_hour: Option<u8>,
}

/// Summarize a schedule for dashboards and CLI output.
pub fn summarize(schedule: &[ScheduleEntry]) -> ScheduleSummary {
    let mut minutes_by_category: HashMap<TaskCategory, u64> = HashMap::new();
    let mut minutes_by_hour: HashMap<u8, u64> = HashMap::new();
    let mut scheduled_count = 0usize;
    let mut total_scheduled_minutes = 0u64;

    for entry in schedule {
        if let Some(start) = entry.start_time() {
            scheduled_count += 1;
            let minutes = entry.duration_minutes as u64;
            total_scheduled_minutes += minutes;
            *minutes_by_category.entry(entry.category).or_insert(0) += minutes;
            *minutes_by_hour.entry(start.hour() as u8).or_insert(0) += minutes;
        }
    }

    // Ties resolve to the earliest hour
    let busiest_hour = minutes_by_hour
        .iter()
        .max_by_key(|(hour, minutes)| (**minutes, std::cmp::Reverse(**hour)))
        .map(|(hour, _)| *hour);

    ScheduleSummary {
        scheduled_count,
        unscheduled_count: schedule.len() - scheduled_count,
        total_scheduled_minutes,
        minutes_by_category,
        busiest_hour,
    }
}
