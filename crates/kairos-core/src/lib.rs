//! # Kairos Core Library
//!
//! Core scheduling logic for Kairos, a personal wellness/productivity
//! application. The library is a plain synchronous API: the surrounding
//! application supplies tasks and free time slots and reads back an
//! optimized schedule, with the CLI binary being a thin layer over the
//! same calls.
//!
//! ## Architecture
//!
//! - **Schedule Optimizer**: a generational genetic search that assigns
//!   tasks to discrete time slots, maximizing a multi-criteria fitness
//!   function (deadline urgency, priority, energy alignment, context
//!   switching, time preference, dependency ordering, workload balance)
//! - **Energy Curve**: a per-session hourly energy profile scored against
//!   each task's required energy
//! - **Heuristics**: break suggestion over the produced schedule and
//!   feedback-driven weight adaptation
//!
//! ## Key Components
//!
//! - [`ScheduleOptimizer`]: one optimization session, owning its
//!   configuration and weights
//! - [`OptimizationResult`]: ordered schedule plus per-generation fitness
//!   trace
//! - [`suggest_break_times`]: gap-based break proposals
//! - [`summarize`]: aggregate statistics over a schedule

pub mod breaks;
pub mod energy;
pub mod error;
pub mod fitness;
pub mod optimizer;
pub mod schedule;
pub mod task;

pub use breaks::{suggest_break_times, BreakSuggestion};
pub use energy::EnergyCurve;
pub use error::{CoreError, Result, ValidationError};
pub use fitness::{FitnessWeights, ScheduleFeedback};
pub use optimizer::{Candidate, OptimizerConfig, ScheduleOptimizer};
pub use schedule::{
    summarize, OptimizationResult, OptimizationStats, Placement, ScheduleEntry, ScheduleSummary,
};
pub use task::{Priority, Task, TaskCategory, TimeSlot};
