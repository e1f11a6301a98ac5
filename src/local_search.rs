//! Best-improvement hill climbing over the combined neighborhood.

use crate::config::Config;
use crate::search::{scored_neighborhood, SearchOutcome, Termination};
use crate::solution::Solution;
use log::{debug, info};

/// Replaces the current solution by its best strictly improving neighbor
/// until none exists.
pub struct LocalSearch {
    config: Config,
}

impl LocalSearch {
    pub fn new(config: &Config) -> Self {
        LocalSearch {
            config: config.clone(),
        }
    }

    /// Run local search to a local optimum (or until a limit is hit).
    pub fn run(&self, initial: Solution) -> SearchOutcome {
        // Stagnation cannot happen here: the loop stops at the first non-improving step
        let termination = Termination::new(&Config {
            max_iterations_without_improvement: u32::MAX,
            ..self.config.clone()
        });

        let mut current = initial;
        let mut current_score = current.time_score();
        let mut trace = vec![current_score];
        let mut iterations = 0;

        info!("Local search started at time score {:.2}", current_score);

        while !termination.reached(iterations, 0) {
            let best_neighbor = scored_neighborhood(&current, self.config.length_delta_bound())
                .into_iter()
                .min_by(|a, b| a.score.total_cmp(&b.score));

            let Some(neighbor) = best_neighbor else {
                break;
            };
            if neighbor.score >= current_score {
                break;
            }

            debug!(
                "Local search step {}: {} move, {:.2} -> {:.2}",
                iterations, neighbor.candidate.kind, current_score, neighbor.score
            );

            current = neighbor.candidate.solution;
            current_score = neighbor.score;
            trace.push(current_score);
            iterations += 1;
        }

        info!(
            "Local search finished after {} steps at time score {:.2}",
            iterations, current_score
        );

        SearchOutcome {
            best: current,
            best_score: current_score,
            iterations,
            trace,
            run_time: termination.elapsed(),
        }
    }
}
