use std::path::PathBuf;

use chrono::{Duration, Timelike, Utc};
use clap::Subcommand;
use kairos_core::{
    suggest_break_times, summarize, BreakSuggestion, OptimizationResult, OptimizerConfig,
    Priority, ScheduleOptimizer, ScheduleSummary, Task, TaskCategory, TimeSlot,
};

#[derive(Subcommand)]
pub enum OptimizeAction {
    /// Run the built-in workday demo scenario
    Demo {
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Optimize a request loaded from a JSON file
    Run {
        /// Path to a JSON file with "tasks" and "slots" arrays
        file: PathBuf,
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(serde::Deserialize)]
struct OptimizeRequest {
    tasks: Vec<Task>,
    slots: Vec<TimeSlot>,
}

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    result: &'a OptimizationResult,
    breaks: &'a [BreakSuggestion],
    summary: &'a ScheduleSummary,
}

pub fn run(action: OptimizeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        OptimizeAction::Demo { seed, json } => {
            let (tasks, slots) = demo_request()?;
            execute(&tasks, &slots, seed, json)
        }
        OptimizeAction::Run { file, seed, json } => {
            let request: OptimizeRequest = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            execute(&request.tasks, &request.slots, seed, json)
        }
    }
}

fn execute(
    tasks: &[Task],
    slots: &[TimeSlot],
    seed: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = OptimizerConfig {
        seed,
        ..Default::default()
    };
    let optimizer = ScheduleOptimizer::with_config(config);
    let result = optimizer.optimize(tasks, slots)?;
    let breaks = suggest_break_times(&result.schedule);
    let summary = summarize(&result.schedule);

    if json {
        let output = JsonOutput {
            result: &result,
            breaks: &breaks,
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("=== Optimized schedule ===");
    for entry in &result.schedule {
        match (entry.start_time(), entry.end_time()) {
            (Some(start), Some(end)) => println!(
                "{}-{}  {}  [{:?}, {:?}]",
                start.format("%H:%M"),
                end.format("%H:%M"),
                entry.task_title,
                entry.priority,
                entry.category,
            ),
            _ => println!("unscheduled   {}", entry.task_title),
        }
    }

    println!();
    println!("Fitness score: {:.3}", result.fitness_score);
    println!(
        "Tasks scheduled: {}/{}",
        result.stats.tasks_scheduled, result.stats.total_tasks
    );
    println!("Total scheduled: {} min", summary.total_scheduled_minutes);
    if let Some(hour) = summary.busiest_hour {
        println!("Busiest hour: {hour:02}:00");
    }

    if !breaks.is_empty() {
        println!();
        println!("=== Suggested breaks ===");
        for b in &breaks {
            println!(
                "{}  {} min",
                b.start_time.format("%H:%M"),
                b.duration_minutes
            );
        }
    }

    Ok(())
}

/// Built-in scenario: three tasks against nine one-hour slots, 09:00-18:00.
fn demo_request() -> Result<(Vec<Task>, Vec<TimeSlot>), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let day_start = now
        .with_hour(9)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .ok_or("failed to anchor the demo day at 09:00")?;

    let tasks = vec![
        Task {
            id: "planning".to_string(),
            title: "Planning meeting".to_string(),
            priority: Priority::High,
            category: TaskCategory::Communication,
            estimated_duration: 60,
            deadline: now + Duration::days(1),
            energy_required: 3,
            focus_required: 4,
            dependencies: vec![],
            context_switch_cost: 2,
            preferred_hours: vec![9, 10, 14, 15],
        },
        Task {
            id: "analysis".to_string(),
            title: "Data analysis".to_string(),
            priority: Priority::Medium,
            category: TaskCategory::Analytical,
            estimated_duration: 90,
            deadline: now + Duration::days(2),
            energy_required: 4,
            focus_required: 5,
            dependencies: vec![],
            context_switch_cost: 4,
            preferred_hours: vec![9, 10, 11],
        },
        Task {
            id: "inbox".to_string(),
            title: "Inbox triage".to_string(),
            priority: Priority::Low,
            category: TaskCategory::Administrative,
            estimated_duration: 30,
            deadline: now + Duration::hours(8),
            energy_required: 2,
            focus_required: 2,
            dependencies: vec![],
            context_switch_cost: 1,
            preferred_hours: vec![13, 16, 17],
        },
    ];

    let mut slots = Vec::with_capacity(9);
    for hour in 0..9 {
        slots.push(TimeSlot::new(day_start + Duration::hours(hour), 60)?);
    }

    Ok((tasks, slots))
}
