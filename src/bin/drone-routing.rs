//! Command-line driver: load a JSON instance, route it and report the result.

use clap::Parser;
use drone_routing::config::{Aspiration, Config, SearchStrategy};
use drone_routing::instance::Instance;
use drone_routing::utils::{format_duration, format_solution, SolutionReport};
use drone_routing::RoutingAlgorithm;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "drone-routing", about = "Route a drone fleet with recharging")]
struct Args {
    /// Instance file (JSON)
    instance: PathBuf,

    /// Improvement procedure after local search
    #[arg(long, value_enum, default_value_t = SearchStrategy::ReactiveTabu)]
    strategy: SearchStrategy,

    /// Seed of the randomized strategies
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 1000)]
    max_iterations: u32,

    #[arg(long, default_value_t = 100)]
    max_iterations_without_improvement: u32,

    /// Time limit in seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Let tabu candidates that beat the best solution override the tabu list
    #[arg(long)]
    aspiration: bool,

    /// Write the JSON report to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Debug logging unless RUST_LOG is set
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    info!("Loading instance from: {}", args.instance.display());
    let instance = Instance::from_file(&args.instance)?;
    let name = instance.name.clone();
    let problem = instance.into_problem()?;
    info!(
        "Loaded instance '{}' with {} drones, {} charging stations and {} orders",
        name,
        problem.drone_count(),
        problem.station_count(),
        problem.order_count()
    );

    let mut config = Config::new()
        .with_strategy(args.strategy)
        .with_seed(args.seed)
        .with_max_iterations(args.max_iterations)
        .with_max_iterations_without_improvement(args.max_iterations_without_improvement);
    if let Some(seconds) = args.time_limit {
        config = config.with_time_limit(Duration::from_secs(seconds));
    }
    if args.aspiration {
        config = config.with_aspiration(Aspiration::ImprovesBest);
    }

    let mut algorithm = RoutingAlgorithm::new(problem, config);
    let best = match algorithm.run() {
        Ok(best) => best.clone(),
        Err(code) => {
            eprintln!("No feasible routing: {}", code);
            process::exit(code.code());
        }
    };

    info!("Search completed in {}", format_duration(algorithm.run_time));
    if let Some(statistics) = &algorithm.statistics {
        eprintln!("{}", statistics.format());
    }
    eprintln!("{}", format_solution(&best, &name));

    let report = serde_json::to_string_pretty(&SolutionReport::new(&best))?;
    match args.output {
        Some(path) => {
            fs::write(&path, report)?;
            info!("Report written to: {}", path.display());
        }
        None => println!("{}", report),
    }

    Ok(())
}
