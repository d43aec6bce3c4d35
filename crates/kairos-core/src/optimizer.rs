//! Generational genetic search over task-to-slot assignments.
//!
//! One [`ScheduleOptimizer`] instance is one optimization session: it owns
//! its configuration (including the fitness weights, which feedback
//! adaptation mutates in place) and its energy curve. A single `optimize`
//! call runs synchronously to completion with no I/O inside the loop.
//!
//! Silent degradation rules inside the search, as opposed to the fail-fast
//! input validation at the entry point:
//! - no fitting slot at construction time leaves a task unscheduled
//! - duplicate slot indices introduced by crossover or mutation are kept,
//!   not repaired; they are only discouraged through fitness
//! - empty populations, empty slot lists, and zero totals yield neutral
//!   values, never panics

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::energy::EnergyCurve;
use crate::error::{Result, ValidationError};
use crate::fitness::{FitnessEvaluator, FitnessWeights, ScheduleFeedback};
use crate::schedule::{build_schedule, OptimizationResult, OptimizationStats};
use crate::task::{Task, TimeSlot};

/// Configuration for one optimization session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Number of candidates per generation
    pub population_size: usize,
    /// Number of generations to run
    pub generations: usize,
    /// Per-gene mutation probability (0.0-1.0)
    pub mutation_rate: f64,
    /// Probability that two selected parents recombine (0.0-1.0)
    pub crossover_rate: f64,
    /// Tournament size for parent selection
    pub tournament_size: usize,
    /// RNG seed for reproducible runs (None = entropy-seeded)
    pub seed: Option<u64>,
    /// Fitness weights, owned by this session
    pub weights: FitnessWeights,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            tournament_size: 3,
            seed: None,
            weights: FitnessWeights::default(),
        }
    }
}

/// One full task-to-slot assignment proposal.
///
/// One gene per task, in task input order: `Some(slot_index)` or `None` for
/// unscheduled. The representation does not forbid duplicate slot indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub genes: Vec<Option<usize>>,
}

impl Candidate {
    /// Greedy random construction: each task picks uniformly among slots
    /// that fit its duration and are unclaimed by earlier genes of this
    /// candidate. This is the only place slot reuse is actively prevented.
    pub fn random<R: Rng>(tasks: &[Task], slots: &[TimeSlot], rng: &mut R) -> Self {
        let mut genes = Vec::with_capacity(tasks.len());
        let mut used: HashSet<usize> = HashSet::new();

        for task in tasks {
            let compatible: Vec<usize> = slots
                .iter()
                .enumerate()
                .filter(|(i, slot)| slot.can_fit(task.estimated_duration) && !used.contains(i))
                .map(|(i, _)| i)
                .collect();

            match compatible.choose(rng) {
                Some(idx) => {
                    used.insert(*idx);
                    genes.push(Some(*idx));
                }
                None => genes.push(None),
            }
        }

        Self { genes }
    }
}

/// Genetic schedule optimizer.
pub struct ScheduleOptimizer {
    config: OptimizerConfig,
    energy_curve: EnergyCurve,
}

impl Default for ScheduleOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleOptimizer {
    /// Create an optimizer with default configuration and energy curve.
    pub fn new() -> Self {
        Self::with_config(OptimizerConfig::default())
    }

    /// Create an optimizer with custom configuration.
    pub fn with_config(config: OptimizerConfig) -> Self {
        Self {
            config,
            energy_curve: EnergyCurve::default(),
        }
    }

    /// Replace the energy curve used for alignment scoring.
    pub fn with_energy_curve(mut self, curve: EnergyCurve) -> Self {
        self.energy_curve = curve;
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.config.weights
    }

    /// Nudge this session's fitness weights from user feedback.
    ///
    /// Affects only subsequent `optimize` calls on this instance.
    pub fn adapt_weights_from_feedback(&mut self, feedback: &ScheduleFeedback) {
        self.config.weights.adapt_from_feedback(feedback);
    }

    /// Run the generational search and build the resulting schedule.
    ///
    /// Inputs are validated fail-fast; the search itself cannot fail.
    pub fn optimize(&self, tasks: &[Task], slots: &[TimeSlot]) -> Result<OptimizationResult> {
        validate_inputs(tasks, slots)?;

        if tasks.is_empty() {
            return Ok(OptimizationResult {
                schedule: Vec::new(),
                fitness_score: 0.0,
                stats: OptimizationStats {
                    generations: self.config.generations,
                    final_fitness: 0.0,
                    fitness_history: Vec::new(),
                    tasks_scheduled: 0,
                    total_tasks: 0,
                },
            });
        }

        let mut rng = match self.config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };

        let evaluator = FitnessEvaluator::new(&self.config.weights, &self.energy_curve);
        let population_size = self.config.population_size.max(1);

        let mut population: Vec<Candidate> = (0..population_size)
            .map(|_| Candidate::random(tasks, slots, &mut rng))
            .collect();

        let mut best_fitness = f64::NEG_INFINITY;
        let mut best_solution: Option<Candidate> = None;
        let mut fitness_history = Vec::with_capacity(self.config.generations);

        for _ in 0..self.config.generations {
            let scores: Vec<f64> = population
                .iter()
                .map(|c| evaluator.evaluate(&c.genes, tasks, slots))
                .collect();

            let (gen_best_index, gen_best) = scores
                .iter()
                .copied()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
                .unwrap_or((0, 0.0));

            if gen_best > best_fitness {
                best_fitness = gen_best;
                best_solution = Some(population[gen_best_index].clone());
            }
            fitness_history.push(gen_best);

            // Elitism: the fittest tenth survives unchanged
            let elite_count = (population_size / 10).max(1);
            let mut ranked: Vec<usize> = (0..population.len()).collect();
            ranked.sort_by(|a, b| {
                scores[*b]
                    .partial_cmp(&scores[*a])
                    .unwrap_or(Ordering::Equal)
            });

            let mut next: Vec<Candidate> = ranked
                .iter()
                .take(elite_count)
                .map(|i| population[*i].clone())
                .collect();

            while next.len() < population_size {
                let parent1 = self.tournament_select(&population, &scores, &mut rng);
                let parent2 = self.tournament_select(&population, &scores, &mut rng);
                let (mut child1, mut child2) = self.crossover(&parent1, &parent2, &mut rng);
                self.mutate(&mut child1, slots.len(), &mut rng);
                self.mutate(&mut child2, slots.len(), &mut rng);

                next.push(child1);
                if next.len() < population_size {
                    next.push(child2);
                }
            }
            population = next;
        }

        let best = best_solution.unwrap_or(Candidate {
            genes: vec![None; tasks.len()],
        });
        let best_fitness = best_fitness.max(0.0);

        let schedule = build_schedule(&best.genes, tasks, slots);
        let tasks_scheduled = schedule.iter().filter(|e| e.is_scheduled()).count();

        Ok(OptimizationResult {
            schedule,
            fitness_score: best_fitness,
            stats: OptimizationStats {
                generations: self.config.generations,
                final_fitness: best_fitness,
                fitness_history,
                tasks_scheduled,
                total_tasks: tasks.len(),
            },
        })
    }

    /// Tournament selection over distinct population indices.
    fn tournament_select<R: Rng>(
        &self,
        population: &[Candidate],
        scores: &[f64],
        rng: &mut R,
    ) -> Candidate {
        let size = self.config.tournament_size.max(1).min(population.len());
        let contenders = rand::seq::index::sample(rng, population.len(), size);

        let winner = contenders
            .iter()
            .max_by(|a, b| scores[*a].partial_cmp(&scores[*b]).unwrap_or(Ordering::Equal))
            .unwrap_or(0);
        population[winner].clone()
    }

    /// Two-point crossover on the raw gene sequences. May reintroduce
    /// duplicate slot indices within a child; not repaired.
    fn crossover<R: Rng>(
        &self,
        parent1: &Candidate,
        parent2: &Candidate,
        rng: &mut R,
    ) -> (Candidate, Candidate) {
        let length = parent1.genes.len();
        if length != parent2.genes.len()
            || length < 2
            || rng.gen::<f64>() > self.config.crossover_rate
        {
            return (parent1.clone(), parent2.clone());
        }

        let point1 = rng.gen_range(0..length);
        let point2 = rng.gen_range(point1..length);

        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();
        for i in point1..=point2 {
            child1.genes[i] = parent2.genes[i];
            child2.genes[i] = parent1.genes[i];
        }
        (child1, child2)
    }

    /// Per-gene mutation: mostly reassigns to a random valid slot, a tenth
    /// of mutation events unschedule the task instead.
    fn mutate<R: Rng>(&self, candidate: &mut Candidate, slot_count: usize, rng: &mut R) {
        for gene in &mut candidate.genes {
            if rng.gen::<f64>() < self.config.mutation_rate {
                *gene = if slot_count == 0 || rng.gen::<f64>() < 0.1 {
                    None
                } else {
                    Some(rng.gen_range(0..slot_count))
                };
            }
        }
    }
}

/// Fail-fast validation of caller-supplied records.
fn validate_inputs(tasks: &[Task], slots: &[TimeSlot]) -> Result<(), ValidationError> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        task.validate()?;
        if !ids.insert(task.id.as_str()) {
            return Err(ValidationError::DuplicateTaskId(task.id.clone()));
        }
    }
    for task in tasks {
        for dependency in &task.dependencies {
            if !ids.contains(dependency.as_str()) {
                return Err(ValidationError::UnknownDependency {
                    task_id: task.id.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
    }
    for slot in slots {
        slot.validate()?;
    }
    Ok(())
}
