//! Break suggestion between scheduled tasks.
//!
//! Purely derivative of the schedule produced by the optimizer: any gap of
//! at least fifteen minutes between two adjacent scheduled entries hosts a
//! suggested break, capped at twenty minutes with a five-minute transition
//! buffer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleEntry;

/// Smallest gap that can host a break, in minutes.
const MIN_GAP_MINUTES: i64 = 15;

/// Transition buffer subtracted from the gap, in minutes.
const TRANSITION_BUFFER_MINUTES: i64 = 5;

/// Longest suggested break, in minutes.
const MAX_BREAK_MINUTES: i64 = 20;

/// Reason attached to every suggested break.
pub const BREAK_REASON: &str = "Pause between tasks to sustain focus";

/// A suggested break between two scheduled tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakSuggestion {
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub reason: String,
}

/// Suggest breaks from the gaps between adjacent scheduled entries.
///
/// The schedule is read in its given order; unscheduled entries are ignored.
pub fn suggest_break_times(schedule: &[ScheduleEntry]) -> Vec<BreakSuggestion> {
    let scheduled: Vec<_> = schedule.iter().filter(|e| e.is_scheduled()).collect();

    let mut breaks = Vec::new();
    for pair in scheduled.windows(2) {
        let (current_end, next_start) = match (pair[0].end_time(), pair[1].start_time()) {
            (Some(end), Some(start)) => (end, start),
            _ => continue,
        };

        let gap_minutes = (next_start - current_end).num_minutes();
        if gap_minutes >= MIN_GAP_MINUTES {
            breaks.push(BreakSuggestion {
                start_time: current_end,
                duration_minutes: (gap_minutes - TRANSITION_BUFFER_MINUTES).min(MAX_BREAK_MINUTES),
                reason: BREAK_REASON.to_string(),
            });
        }
    }

    breaks
}
