//! # Drone routing
//!
//! Assigns delivery orders to a fleet of range-limited drones that must
//! recharge at charging stations along the way.
//!
//! A backtracking construction produces a first feasible routing, which is then
//! improved by hill climbing and one of several metaheuristics (reactive tabu
//! search, random walk, threshold accepting, simulated annealing) over a
//! neighborhood of two-opt, relocate, exchange and cross moves.

pub mod config;
pub mod construction;
pub mod error;
pub mod instance;
pub mod local_search;
pub mod metaheuristics;
pub mod neighborhood;
pub mod problem;
pub mod search;
pub mod solution;
pub mod tabu;
pub mod utils;

use crate::config::{Config, SearchStrategy};
use crate::construction::{ExitCode, InitialSolution};
use crate::local_search::LocalSearch;
use crate::metaheuristics::{AcceptanceSearch, RandomWalk, SimulatedAnnealing, ThresholdAccepting};
use crate::problem::Problem;
use crate::search::SearchOutcome;
use crate::solution::Solution;
use crate::tabu::ReactiveTabuSearch;
use crate::utils::SearchStatistics;

use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs construction, local search and the configured metaheuristic.
pub struct RoutingAlgorithm {
    pub problem: Arc<Problem>,
    pub config: Config,
    pub initial_solution: Option<Solution>,
    pub best_solution: Option<Solution>,
    pub statistics: Option<SearchStatistics>,
    pub run_time: Duration,
}

impl RoutingAlgorithm {
    pub fn new(problem: Problem, config: Config) -> Self {
        RoutingAlgorithm {
            problem: Arc::new(problem),
            config,
            initial_solution: None,
            best_solution: None,
            statistics: None,
            run_time: Duration::from_secs(0),
        }
    }

    /// Build the initial solution.
    pub fn initialize(&mut self) -> Result<&Solution, ExitCode> {
        let mut construction = InitialSolution::new(Arc::clone(&self.problem), self.config.max_backtracks);
        let solution = construction.build()?;
        Ok(&*self.initial_solution.insert(solution))
    }

    /// Run every phase and return the best solution found.
    pub fn run(&mut self) -> Result<&Solution, ExitCode> {
        let start_time = Instant::now();

        let mut construction = InitialSolution::new(Arc::clone(&self.problem), self.config.max_backtracks);
        let initial = construction.build()?;

        let local_optimum = LocalSearch::new(&self.config).run(initial.clone());
        let metaheuristic = self.improve(&local_optimum.best);

        self.statistics = Some(SearchStatistics::new(
            &initial,
            &local_optimum,
            metaheuristic.as_ref(),
            construction.backtracks(),
        ));

        let outcome = metaheuristic.unwrap_or(local_optimum);
        info!(
            "Best solution: time score {:.2}, distance {:.2}",
            outcome.best_score,
            outcome.best.distance_score()
        );

        self.initial_solution = Some(initial);
        self.run_time = start_time.elapsed();

        Ok(&*self.best_solution.insert(outcome.best))
    }

    /// Run the configured metaheuristic from the local optimum. `None` when
    /// the strategy stops at hill climbing.
    fn improve(&self, local_optimum: &Solution) -> Option<SearchOutcome> {
        let config = &self.config;
        let start = || local_optimum.clone();

        let outcome = match config.strategy {
            SearchStrategy::LocalSearch => return None,
            SearchStrategy::ReactiveTabu => ReactiveTabuSearch::new(config).run(start()),
            SearchStrategy::RandomWalk => AcceptanceSearch::new(RandomWalk, config).run(start()),
            SearchStrategy::ThresholdAccepting => {
                AcceptanceSearch::new(ThresholdAccepting::from_config(config), config).run(start())
            }
            SearchStrategy::SimulatedAnnealing => {
                AcceptanceSearch::new(SimulatedAnnealing::from_config(config), config).run(start())
            }
        };
        Some(outcome)
    }
}
