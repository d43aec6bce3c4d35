//! Multi-criteria fitness evaluation for candidate schedules.
//!
//! A candidate is scored by six per-assignment factors (deadline urgency,
//! priority, energy alignment, context switching, time preference, dependency
//! ordering) plus a per-candidate workload-balance term, combined by a
//! weighted sum and scaled by the fraction of tasks actually scheduled.
//!
//! Evaluation is total: degenerate inputs (length mismatch, empty lists,
//! nothing scheduled) yield zero rather than an error, and the score is
//! always non-negative.

use std::collections::HashMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::energy::EnergyCurve;
use crate::task::{Priority, Task, TimeSlot};

/// Weights for the fitness factors.
///
/// Owned by one optimizer session; adaptation from feedback mutates this
/// value in place and renormalizes it, never any shared state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitnessWeights {
    pub deadline_urgency: f64,
    pub priority: f64,
    pub energy_alignment: f64,
    pub context_switch: f64,
    pub time_preference: f64,
    pub dependency_order: f64,
    pub workload_balance: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            deadline_urgency: 0.25,
            priority: 0.20,
            energy_alignment: 0.15,
            context_switch: 0.15,
            time_preference: 0.10,
            dependency_order: 0.10,
            workload_balance: 0.05,
        }
    }
}

impl FitnessWeights {
    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.deadline_urgency
            + self.priority
            + self.energy_alignment
            + self.context_switch
            + self.time_preference
            + self.dependency_order
            + self.workload_balance
    }

    /// Rescale so the weights sum to 1. A zero total is left untouched.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total <= 0.0 {
            return;
        }
        self.deadline_urgency /= total;
        self.priority /= total;
        self.energy_alignment /= total;
        self.context_switch /= total;
        self.time_preference /= total;
        self.dependency_order /= total;
        self.workload_balance /= total;
    }

    /// Nudge the weights from a satisfaction signal and renormalize.
    ///
    /// Low satisfaction shifts emphasis toward deadlines and priorities;
    /// high satisfaction reinforces energy alignment.
    pub fn adapt_from_feedback(&mut self, feedback: &ScheduleFeedback) {
        let satisfaction = feedback.satisfaction.clamp(0.0, 1.0);
        if satisfaction < 0.5 {
            self.priority *= 1.1;
            self.deadline_urgency *= 1.1;
            self.energy_alignment *= 0.9;
        } else {
            self.energy_alignment *= 1.05;
        }
        self.normalize();
    }
}

/// User feedback on a produced schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduleFeedback {
    /// Satisfaction with the schedule (0.0-1.0)
    pub satisfaction: f64,
}

/// Fitness evaluator for one optimization run.
///
/// Borrows the weights and energy curve from the optimizer session so that
/// evaluating a candidate is a pure function of its inputs.
pub struct FitnessEvaluator<'a> {
    weights: &'a FitnessWeights,
    curve: &'a EnergyCurve,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(weights: &'a FitnessWeights, curve: &'a EnergyCurve) -> Self {
        Self { weights, curve }
    }

    /// Score a candidate assignment. One gene per task: `Some(slot_index)`
    /// or `None` for unscheduled. Genes that are `None` or out of range are
    /// skipped; a gene/task length mismatch scores zero.
    pub fn evaluate(&self, genes: &[Option<usize>], tasks: &[Task], slots: &[TimeSlot]) -> f64 {
        if genes.len() != tasks.len() || tasks.is_empty() {
            return 0.0;
        }

        let mut total_score = 0.0;
        let mut scheduled_count = 0usize;

        for (i, (task, gene)) in tasks.iter().zip(genes.iter()).enumerate() {
            let slot = match gene.and_then(|idx| slots.get(idx)) {
                Some(slot) => slot,
                None => continue,
            };
            scheduled_count += 1;

            let task_score = self.weights.deadline_urgency * urgency_score(task, slot)
                + self.weights.priority * priority_score(task)
                + self.weights.energy_alignment * self.energy_score(task, slot)
                + self.weights.context_switch * context_score(i, genes, tasks, slots)
                + self.weights.time_preference * time_preference_score(task, slot.hour())
                + self.weights.dependency_order * dependency_score(task, genes, tasks, slots, slot);

            total_score += task_score;
        }

        if scheduled_count > 0 {
            let balance = workload_balance(genes, tasks, slots);
            total_score += self.weights.workload_balance * balance * scheduled_count as f64;
        }

        // Incompleteness penalty: leaving tasks unscheduled is always
        // fitness-dominated by scheduling them, all else equal.
        total_score * (scheduled_count as f64 / tasks.len() as f64)
    }

    fn energy_score(&self, task: &Task, slot: &TimeSlot) -> f64 {
        let user_energy = self.curve.energy_at(slot.hour());
        let required = task.energy_required as f64 / 5.0;
        1.0 - (user_energy - required).abs()
    }
}

/// Deadline urgency: ramps up as the deadline approaches, zero once missed.
fn urgency_score(task: &Task, slot: &TimeSlot) -> f64 {
    let hours_to_deadline = (task.deadline - slot.start_time).num_seconds() as f64 / 3600.0;
    if hours_to_deadline > 0.0 {
        (24.0 / hours_to_deadline.max(1.0)).min(1.0)
    } else {
        0.0
    }
}

/// Priority weight, normalized so critical maps to 1.0.
fn priority_score(task: &Task) -> f64 {
    task.priority.value() as f64 / Priority::MAX_VALUE as f64
}

/// Context-switch factor: penalizes following a scheduled task of a
/// different category (ordering is input order, not slot time).
fn context_score(i: usize, genes: &[Option<usize>], tasks: &[Task], slots: &[TimeSlot]) -> f64 {
    if i == 0 {
        return 1.0;
    }
    let prev_scheduled = genes[i - 1].map(|idx| idx < slots.len()).unwrap_or(false);
    if prev_scheduled && tasks[i - 1].category != tasks[i].category {
        (1.0 - tasks[i].context_switch_cost as f64 / 10.0).max(0.0)
    } else {
        1.0
    }
}

/// Time preference: 1.0 on a preferred hour, decaying with distance to the
/// nearest preferred hour, 0.5 when the task has no preference.
fn time_preference_score(task: &Task, hour: u8) -> f64 {
    if task.preferred_hours.is_empty() {
        return 0.5;
    }
    if task.preferred_hours.contains(&hour) {
        return 1.0;
    }
    let min_distance = task
        .preferred_hours
        .iter()
        .map(|pref| (hour as i32 - *pref as i32).abs())
        .min()
        .unwrap_or(0);
    (1.0 - min_distance as f64 / 12.0).max(0.0)
}

/// Dependency ordering: zero if any dependency is scheduled to end at or
/// after this task's start. Unscheduled dependencies do not count as
/// violations.
fn dependency_score(
    task: &Task,
    genes: &[Option<usize>],
    tasks: &[Task],
    slots: &[TimeSlot],
    slot: &TimeSlot,
) -> f64 {
    for dep_id in &task.dependencies {
        let dep_index = match tasks.iter().position(|t| &t.id == dep_id) {
            Some(idx) => idx,
            None => continue,
        };
        let dep_slot = match genes.get(dep_index).copied().flatten().and_then(|idx| slots.get(idx)) {
            Some(slot) => slot,
            None => continue,
        };
        let dep_end =
            dep_slot.start_time + Duration::minutes(tasks[dep_index].estimated_duration as i64);
        if slot.start_time < dep_end {
            return 0.0;
        }
    }
    1.0
}

/// Workload balance: inverse variance of per-hour scheduled minutes.
fn workload_balance(genes: &[Option<usize>], tasks: &[Task], slots: &[TimeSlot]) -> f64 {
    let mut hourly_minutes: HashMap<u8, f64> = HashMap::new();
    for (task, gene) in tasks.iter().zip(genes.iter()) {
        if let Some(slot) = gene.and_then(|idx| slots.get(idx)) {
            *hourly_minutes.entry(slot.hour()).or_insert(0.0) += task.estimated_duration as f64;
        }
    }
    if hourly_minutes.is_empty() {
        return 0.0;
    }

    let loads: Vec<f64> = hourly_minutes.values().copied().collect();
    let mean = loads.iter().sum::<f64>() / loads.len() as f64;
    let variance = loads.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / loads.len() as f64;

    1.0 / (1.0 + variance / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskCategory;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn base_time() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn task(id: &str, duration: u32, category: TaskCategory) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            priority: Priority::Medium,
            category,
            estimated_duration: duration,
            deadline: base_time() + Duration::days(2),
            energy_required: 3,
            focus_required: 3,
            dependencies: vec![],
            context_switch_cost: 2,
            preferred_hours: vec![],
        }
    }

    fn hourly_slots(count: usize) -> Vec<TimeSlot> {
        (0..count)
            .map(|i| TimeSlot::new(base_time() + Duration::hours(i as i64), 60).unwrap())
            .collect()
    }

    #[test]
    fn length_mismatch_scores_zero() {
        let weights = FitnessWeights::default();
        let curve = EnergyCurve::default();
        let evaluator = FitnessEvaluator::new(&weights, &curve);

        let tasks = vec![task("a", 60, TaskCategory::Analytical)];
        let slots = hourly_slots(3);
        assert_eq!(evaluator.evaluate(&[], &tasks, &slots), 0.0);
        assert_eq!(
            evaluator.evaluate(&[Some(0), Some(1)], &tasks, &slots),
            0.0
        );
    }

    #[test]
    fn evaluation_is_idempotent() {
        let weights = FitnessWeights::default();
        let curve = EnergyCurve::default();
        let evaluator = FitnessEvaluator::new(&weights, &curve);

        let tasks = vec![
            task("a", 60, TaskCategory::Analytical),
            task("b", 30, TaskCategory::Creative),
        ];
        let slots = hourly_slots(4);
        let genes = vec![Some(0), Some(2)];

        let first = evaluator.evaluate(&genes, &tasks, &slots);
        let second = evaluator.evaluate(&genes, &tasks, &slots);
        assert_eq!(first, second);
        assert!(first > 0.0);
    }

    #[test]
    fn missed_deadline_zeroes_urgency() {
        let mut t = task("late", 60, TaskCategory::Administrative);
        // Deadline earlier than every slot start
        t.deadline = base_time() - Duration::hours(1);
        let slots = hourly_slots(3);
        for slot in &slots {
            assert_eq!(urgency_score(&t, slot), 0.0);
        }
    }

    #[test]
    fn urgency_caps_at_one_near_deadline() {
        let mut t = task("soon", 30, TaskCategory::Administrative);
        t.deadline = base_time() + Duration::hours(2);
        let slot = TimeSlot::new(base_time(), 60).unwrap();
        assert_eq!(urgency_score(&t, &slot), 1.0);

        t.deadline = base_time() + Duration::hours(48);
        assert!((urgency_score(&t, &slot) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn time_preference_decays_with_distance() {
        let mut t = task("pref", 60, TaskCategory::Creative);
        assert_eq!(time_preference_score(&t, 9), 0.5);

        t.preferred_hours = vec![9, 14];
        assert_eq!(time_preference_score(&t, 14), 1.0);
        assert!((time_preference_score(&t, 11) - (1.0 - 2.0 / 12.0)).abs() < 1e-9);
        // Far away still floors at zero
        t.preferred_hours = vec![0];
        assert_eq!(time_preference_score(&t, 23), 0.0);
    }

    #[test]
    fn context_switch_penalizes_category_change() {
        let tasks = vec![
            task("a", 60, TaskCategory::Analytical),
            {
                let mut t = task("b", 60, TaskCategory::Creative);
                t.context_switch_cost = 4;
                t
            },
        ];
        let slots = hourly_slots(2);
        let genes = vec![Some(0), Some(1)];

        assert_eq!(context_score(0, &genes, &tasks, &slots), 1.0);
        assert!((context_score(1, &genes, &tasks, &slots) - 0.6).abs() < 1e-9);

        // Unscheduled predecessor carries no penalty
        let genes = vec![None, Some(1)];
        assert_eq!(context_score(1, &genes, &tasks, &slots), 1.0);
    }

    #[test]
    fn dependency_violation_scores_exactly_zero() {
        let mut dependent = task("b", 60, TaskCategory::Analytical);
        dependent.dependencies = vec!["a".to_string()];
        let tasks = vec![task("a", 60, TaskCategory::Analytical), dependent];
        let slots = hourly_slots(2);

        // Dependency in slot 1 (ends 11:00), dependent in slot 0 (starts 09:00)
        let genes = vec![Some(1), Some(0)];
        assert_eq!(
            dependency_score(&tasks[1], &genes, &tasks, &slots, &slots[0]),
            0.0
        );

        // Correct ordering scores full
        let genes = vec![Some(0), Some(1)];
        assert_eq!(
            dependency_score(&tasks[1], &genes, &tasks, &slots, &slots[1]),
            1.0
        );

        // An unscheduled dependency is not a violation
        let genes = vec![None, Some(0)];
        assert_eq!(
            dependency_score(&tasks[1], &genes, &tasks, &slots, &slots[0]),
            1.0
        );
    }

    #[test]
    fn completion_penalty_scales_with_scheduled_fraction() {
        // Identical tasks and identical slot starts so every assignment has
        // the same per-task score; workload weight off to isolate the factor.
        let mut weights = FitnessWeights::default();
        weights.workload_balance = 0.0;
        let curve = EnergyCurve::default();
        let evaluator = FitnessEvaluator::new(&weights, &curve);

        let tasks: Vec<Task> = (0..4)
            .map(|i| task(&format!("t{i}"), 30, TaskCategory::Learning))
            .collect();
        let slots: Vec<TimeSlot> = (0..4)
            .map(|_| TimeSlot::new(base_time(), 60).unwrap())
            .collect();

        let none = evaluator.evaluate(&[None, None, None, None], &tasks, &slots);
        let half = evaluator.evaluate(&[Some(0), Some(1), None, None], &tasks, &slots);
        let full = evaluator.evaluate(&[Some(0), Some(1), Some(2), Some(3)], &tasks, &slots);

        assert_eq!(none, 0.0);
        assert!(half > 0.0);
        // Per-task sum doubles and the completion multiplier doubles
        assert!((full - 4.0 * half).abs() < 1e-9);
    }

    #[test]
    fn fully_scheduled_beats_one_unscheduled() {
        let weights = FitnessWeights::default();
        let curve = EnergyCurve::default();
        let evaluator = FitnessEvaluator::new(&weights, &curve);

        // Every task sits at its single preferred hour with deadline slack
        let mut tasks = vec![
            task("a", 60, TaskCategory::Analytical),
            task("b", 60, TaskCategory::Analytical),
            task("c", 60, TaskCategory::Analytical),
        ];
        let slots = hourly_slots(3);
        for (t, slot) in tasks.iter_mut().zip(slots.iter()) {
            t.preferred_hours = vec![slot.hour()];
        }

        let full = evaluator.evaluate(&[Some(0), Some(1), Some(2)], &tasks, &slots);
        let partial = evaluator.evaluate(&[Some(0), Some(1), None], &tasks, &slots);
        assert!(full > partial);
    }

    #[test]
    fn workload_balance_penalizes_uneven_hours() {
        let slots = hourly_slots(2);

        let even_tasks = vec![
            task("a", 60, TaskCategory::Analytical),
            task("b", 60, TaskCategory::Analytical),
        ];
        let uneven_tasks = vec![
            task("a", 120, TaskCategory::Analytical),
            task("b", 30, TaskCategory::Analytical),
        ];
        let genes = vec![Some(0), Some(1)];

        let even = workload_balance(&genes, &even_tasks, &slots);
        let uneven = workload_balance(&genes, &uneven_tasks, &slots);
        assert_eq!(even, 1.0);
        assert!(uneven < even);

        // Nothing scheduled is neutral, not an error
        assert_eq!(workload_balance(&[None, None], &even_tasks, &slots), 0.0);
    }

    #[test]
    fn adapt_from_low_satisfaction_shifts_toward_deadlines() {
        let mut weights = FitnessWeights::default();
        let before = weights;
        weights.adapt_from_feedback(&ScheduleFeedback { satisfaction: 0.2 });

        assert!((weights.total() - 1.0).abs() < 1e-9);
        assert!(weights.deadline_urgency > before.deadline_urgency);
        assert!(weights.priority > before.priority);
        assert!(weights.energy_alignment < before.energy_alignment);
    }

    #[test]
    fn adapt_from_high_satisfaction_reinforces_energy() {
        let mut weights = FitnessWeights::default();
        let before = weights;
        weights.adapt_from_feedback(&ScheduleFeedback { satisfaction: 0.9 });

        assert!((weights.total() - 1.0).abs() < 1e-9);
        assert!(weights.energy_alignment > before.energy_alignment);
    }

    #[test]
    fn adapt_clamps_out_of_range_satisfaction() {
        let mut low = FitnessWeights::default();
        low.adapt_from_feedback(&ScheduleFeedback { satisfaction: -3.0 });
        let mut floor = FitnessWeights::default();
        floor.adapt_from_feedback(&ScheduleFeedback { satisfaction: 0.0 });
        assert!((low.deadline_urgency - floor.deadline_urgency).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn fitness_is_non_negative(
            genes in proptest::collection::vec(proptest::option::of(0usize..16), 0..8)
        ) {
            let weights = FitnessWeights::default();
            let curve = EnergyCurve::default();
            let evaluator = FitnessEvaluator::new(&weights, &curve);

            let tasks = vec![
                task("a", 60, TaskCategory::Analytical),
                task("b", 90, TaskCategory::Creative),
                task("c", 30, TaskCategory::Administrative),
            ];
            let slots = hourly_slots(9);

            // Arbitrary gene vectors, including wrong lengths and
            // out-of-range indices, never score below zero.
            let score = evaluator.evaluate(&genes, &tasks, &slots);
            prop_assert!(score >= 0.0);
        }

        #[test]
        fn fitness_is_deterministic(
            genes in proptest::collection::vec(proptest::option::of(0usize..9), 3)
        ) {
            let weights = FitnessWeights::default();
            let curve = EnergyCurve::default();
            let evaluator = FitnessEvaluator::new(&weights, &curve);

            let tasks = vec![
                task("a", 60, TaskCategory::Analytical),
                task("b", 90, TaskCategory::Creative),
                task("c", 30, TaskCategory::Administrative),
            ];
            let slots = hourly_slots(9);

            prop_assert_eq!(
                evaluator.evaluate(&genes, &tasks, &slots),
                evaluator.evaluate(&genes, &tasks, &slots)
            );
        }
    }
}
