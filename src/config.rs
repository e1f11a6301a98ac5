//! Configuration parameters for construction and search.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Improvement procedure run after the local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Stop at the first local optimum
    LocalSearch,
    ReactiveTabu,
    RandomWalk,
    ThresholdAccepting,
    SimulatedAnnealing,
}

/// Whether a tabu candidate may override the prohibition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspiration {
    /// Tabu candidates are only taken when no non-tabu candidate exists
    Disabled,
    /// A tabu candidate beating the best solution found so far is preferred
    ImprovesBest,
}

/// Configuration settings for the routing engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub strategy: SearchStrategy,
    /// Seed of the randomized drivers
    pub seed: u64,
    /// Abandoned branches allowed during construction
    pub max_backtracks: usize,
    /// Moves whose distance delta reaches this bound are pruned (None = unbounded)
    pub max_length_delta: Option<f64>,
    /// Iteration cap of every search driver
    pub max_iterations: u32,
    /// Stop after this many iterations without a new best solution
    pub max_iterations_without_improvement: u32,
    /// Optional time limit of every search driver
    pub time_limit: Option<Duration>,
    pub tabu_initial_length: usize,
    pub tabu_min_length: usize,
    pub tabu_max_length: usize,
    /// Multiplicative growth of the tabu length on a repetition (δ1)
    pub tabu_increase_factor: f64,
    /// Additive growth of the tabu length on a repetition (δ2)
    pub tabu_increase_step: f64,
    /// Iterations without repetition before the tabu length shrinks
    pub tabu_shrink_after: u32,
    pub aspiration: Aspiration,
    /// Accepted worsening of threshold accepting [s]
    pub initial_threshold: f64,
    pub threshold_decay: f64,
    /// Starting temperature of simulated annealing [s]
    pub initial_temperature: f64,
    pub cooling_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strategy: SearchStrategy::ReactiveTabu,
            seed: 42,
            max_backtracks: 100_000,
            max_length_delta: None,
            max_iterations: 1000,
            max_iterations_without_improvement: 100,
            time_limit: None,
            tabu_initial_length: 5,
            tabu_min_length: 1,
            tabu_max_length: 50,
            tabu_increase_factor: 1.1,
            tabu_increase_step: 1.0,
            tabu_shrink_after: 10,
            aspiration: Aspiration::Disabled,
            initial_threshold: 600.0,
            threshold_decay: 0.95,
            initial_temperature: 600.0,
            cooling_rate: 0.95,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Bound applied to move deltas during neighbor generation.
    pub fn length_delta_bound(&self) -> f64 {
        self.max_length_delta.unwrap_or(f64::INFINITY)
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_backtracks(mut self, backtracks: usize) -> Self {
        self.max_backtracks = backtracks;
        self
    }

    pub fn with_max_length_delta(mut self, delta: f64) -> Self {
        self.max_length_delta = Some(delta);
        self
    }

    /// Set the overall iteration cap.
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the maximum iterations without improvement.
    pub fn with_max_iterations_without_improvement(mut self, iterations: u32) -> Self {
        self.max_iterations_without_improvement = iterations;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Set the initial, minimum and maximum tabu list length.
    pub fn with_tabu_length(mut self, initial: usize, min: usize, max: usize) -> Self {
        self.tabu_initial_length = initial;
        self.tabu_min_length = min;
        self.tabu_max_length = max;
        self
    }

    /// Set the growth parameters of the tabu length.
    pub fn with_tabu_reaction(mut self, factor: f64, step: f64, shrink_after: u32) -> Self {
        self.tabu_increase_factor = factor;
        self.tabu_increase_step = step;
        self.tabu_shrink_after = shrink_after;
        self
    }

    pub fn with_aspiration(mut self, aspiration: Aspiration) -> Self {
        self.aspiration = aspiration;
        self
    }

    pub fn with_threshold(mut self, initial: f64, decay: f64) -> Self {
        self.initial_threshold = initial;
        self.threshold_decay = decay;
        self
    }

    pub fn with_annealing(mut self, initial_temperature: f64, cooling_rate: f64) -> Self {
        self.initial_temperature = initial_temperature;
        self.cooling_rate = cooling_rate;
        self
    }
}
