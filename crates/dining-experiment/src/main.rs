//! Dining Philosophers simulation CLI.
//!
//! Seats N philosophers around a ring of shared chopsticks, assigns each a
//! random meal target below `--max-meals`, runs them to completion, and
//! prints who finished in what order along with the final tallies.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, Utc};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dining_experiment::results::{RunConfig, SimulationResult};
use table_kernel::{Table, TableConfig};

const DEFAULT_NAMES: [&str; 5] = ["Plato", "Aristotle", "Augustine", "Aquinas", "Stein"];

/// Generate a timestamped output path from the given path.
/// e.g., "results.json" -> "results-20260806-010530.json"
fn timestamped_path(path: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("results");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let parent = path.parent().unwrap_or(std::path::Path::new("."));
    parent.join(format!("{}-{}.{}", stem, timestamp, ext))
}

#[derive(Parser)]
#[command(name = "dining-experiment")]
#[command(version)]
#[command(about = "Dining philosophers with timeout-based deadlock avoidance")]
struct Cli {
    /// Upper bound for the per-philosopher meal target; each target is drawn
    /// uniformly from [1, max)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(2..))]
    max_meals: u32,

    /// Number of philosophers (ignored when --names is given)
    #[arg(long, default_value = "5")]
    philosophers: usize,

    /// Explicit philosopher names (comma-separated); seats follow list order
    #[arg(long, value_delimiter = ',')]
    names: Option<Vec<String>>,

    /// How long to wait for the neighbor's chopstick before backing off (ms)
    #[arg(long, default_value = "1000")]
    hold_timeout_ms: u64,

    /// Upper bound for a thinking pause (ms)
    #[arg(long, default_value = "1000")]
    max_think_ms: u64,

    /// Upper bound for an eating pause (ms)
    #[arg(long, default_value = "1000")]
    max_eat_ms: u64,

    /// Random seed for reproducible meal targets
    #[arg(long)]
    seed: Option<u64>,

    /// Output file for results (JSON); the file name is timestamped
    #[arg(long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Resolve seat names: an explicit list wins, otherwise the classic five are
/// extended with numbered seats as needed.
fn seat_names(names: Option<Vec<String>>, count: usize) -> Vec<String> {
    match names {
        Some(names) => names,
        None => (0..count)
            .map(|i| match DEFAULT_NAMES.get(i) {
                Some(name) => (*name).to_string(),
                None => format!("Philosopher {}", i + 1),
            })
            .collect(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let names = seat_names(cli.names, cli.philosophers);
    if names.len() < 2 {
        anyhow::bail!("a dining table needs at least two philosophers");
    }

    let config = TableConfig {
        hold_timeout_ms: cli.hold_timeout_ms,
        max_think_ms: cli.max_think_ms,
        max_eat_ms: cli.max_eat_ms,
        seed: cli.seed,
    };
    let run_config = RunConfig {
        philosophers: names.len(),
        max_meals: Some(cli.max_meals),
        hold_timeout_ms: cli.hold_timeout_ms,
        max_think_ms: cli.max_think_ms,
        max_eat_ms: cli.max_eat_ms,
        seed: cli.seed,
    };

    info!(
        philosophers = names.len(),
        max_meals = cli.max_meals,
        "starting dinner"
    );

    let table = Table::seat(names, cli.max_meals, &config);
    let started_at = Utc::now();
    let reports = table.run().await;
    let ended_at = Utc::now();

    let result = SimulationResult::from_reports(run_config, started_at, ended_at, &reports);

    println!("\n=== Dinner Complete ===");
    println!("Finished in order:");
    for tally in &result.completion_order {
        println!("  {}", tally.name);
    }
    println!("\nTallies:");
    for tally in &result.tallies {
        println!(
            "  {} ate {} times (target {}, {} timed-out rounds)",
            tally.name, tally.meals_eaten, tally.target_meals, tally.timed_out_rounds
        );
    }
    println!("\nTotal meals: {}", result.total_meals);
    println!("Total timed-out rounds: {}", result.total_timed_out_rounds);

    if let Some(output) = cli.output {
        let output_path = timestamped_path(&output);
        result.save(&output_path)?;
        println!("Results saved to: {}", output_path.display());
    }

    Ok(())
}
